use foundation::{GeoBounds, LatLon};
use scene::{PlaceIndex, PlaceWorld};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FitOptions {
    pub animate: bool,
    pub duration_s: f64,
    pub max_zoom: f64,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct InitialView {
    pub center: LatLon,
    pub zoom: f64,
}

/// Padded bounding box of the visible places, or `None` when nothing is
/// visible.
pub fn visible_bounds(
    world: &PlaceWorld,
    visible: &[PlaceIndex],
    padding_ratio: f64,
) -> Option<GeoBounds> {
    let points = visible
        .iter()
        .filter_map(|idx| world.place(*idx))
        .map(|p| p.position);
    GeoBounds::from_points(points).map(|b| b.pad(padding_ratio))
}

/// Zoom for flying to a selected place: never zooms out.
pub fn fly_zoom(current: f64, min_zoom: f64) -> f64 {
    if current.is_finite() {
        current.max(min_zoom)
    } else {
        min_zoom
    }
}
