use std::fmt;

/// Marker/category color.
///
/// `Display` renders a CSS color string so the value can be handed straight
/// to a widget or a style attribute.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Rgb([u8; 3]),
    Hsl {
        hue: u16,
        saturation: u8,
        lightness: u8,
    },
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color::Rgb([r, g, b])
    }

    pub const fn hsl(hue: u16, saturation: u8, lightness: u8) -> Self {
        Color::Hsl {
            hue,
            saturation,
            lightness,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Rgb([r, g, b]) => write!(f, "#{r:02x}{g:02x}{b:02x}"),
            Color::Hsl {
                hue,
                saturation,
                lightness,
            } => write!(f, "hsl({hue}, {saturation}%, {lightness}%)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Color;

    #[test]
    fn renders_css() {
        assert_eq!(Color::rgb(0x2c, 0x7a, 0x4b).to_string(), "#2c7a4b");
        assert_eq!(Color::hsl(210, 86, 40).to_string(), "hsl(210, 86%, 40%)");
    }
}
