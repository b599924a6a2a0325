use foundation::{Color, LatLon, PlaceId};
use scene::PlaceEntry;

/// Circle marker appearance.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MarkerStyle {
    pub color: Color,
    pub radius_px: f32,
    pub stroke_width_px: f32,
    pub fill_opacity: f32,
}

impl MarkerStyle {
    pub const fn new(color: Color) -> Self {
        Self {
            color,
            radius_px: 8.0,
            stroke_width_px: 3.0,
            fill_opacity: 1.0,
        }
    }
}

/// Swatch used by the "all categories" chip.
pub const ALL_CATEGORIES_SWATCH: Color = Color::rgb(0x2c, 0x7a, 0x4b);

/// Everything the widget needs to create one place marker and its label.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    pub id: PlaceId,
    pub position: LatLon,
    pub label: String,
    pub style: MarkerStyle,
}

impl MarkerSpec {
    pub fn for_entry(entry: &PlaceEntry) -> Self {
        Self {
            id: entry.place.id.clone(),
            position: entry.place.position,
            label: entry.place.name.clone(),
            style: MarkerStyle::new(entry.color),
        }
    }
}
