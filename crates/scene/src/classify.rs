//! Episode extraction and category coloring.

use std::sync::LazyLock;

use foundation::Color;
use regex::Regex;

/// Returned by [`parse_episode`] when the category names no episode.
///
/// Positive infinity sorts after every real episode number.
pub const NO_EPISODE: f64 = f64::INFINITY;

/// Fixed colors for episodes 1 through 5.
pub const EPISODE_PALETTE: [Color; 5] = [
    Color::rgb(0xe0, 0x31, 0x31),
    Color::rgb(0xf0, 0x8c, 0x00),
    Color::rgb(0x2f, 0x9e, 0x44),
    Color::rgb(0x19, 0x71, 0xc2),
    Color::rgb(0x9c, 0x36, 0xb5),
];

pub const HASH_SATURATION: u8 = 86;
pub const HASH_LIGHTNESS: u8 = 40;

static EPISODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)ep\.?\s*(\d+(?:\.\d+)?)|에피소드\s*(\d+(?:\.\d+)?)")
        .expect("episode pattern compiles")
});

/// Episode ordinal encoded in a category label.
///
/// Recognizes `ep`, `Ep.`, `EP. 3`, `ep3.5` and `에피소드 12`; the first match
/// wins. Returns [`NO_EPISODE`] when nothing matches.
pub fn parse_episode(category: &str) -> f64 {
    let Some(caps) = EPISODE_RE.captures(category) else {
        return NO_EPISODE;
    };
    caps.get(1)
        .or_else(|| caps.get(2))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(NO_EPISODE)
}

/// Deterministic color for a category label.
///
/// Episodes 1..=5 use [`EPISODE_PALETTE`]; everything else gets a hue from
/// [`category_hash`] at fixed saturation and lightness.
pub fn color_for(category: &str) -> Color {
    let episode = parse_episode(category);
    if episode.fract() == 0.0 && (1.0..=5.0).contains(&episode) {
        return EPISODE_PALETTE[episode as usize - 1];
    }
    let hue = category_hash(category).rem_euclid(360) as u16;
    Color::hsl(hue, HASH_SATURATION, HASH_LIGHTNESS)
}

/// `h = h * 31 + unit` over UTF-16 code units with 32-bit wraparound.
///
/// Matches the classic string hash used by the web client, so both sides
/// agree on colors for the same label.
pub fn category_hash(value: &str) -> i32 {
    value
        .encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)))
}
