use core::cmp::Ordering;

use foundation::stable_total_cmp_f64;

use crate::collate::collate;
use crate::world::{PlaceEntry, PlaceIndex, PlaceWorld};

/// Display-priority comparison.
///
/// Keys, in order:
/// 1. episode ascending (no episode last)
/// 2. video start offset ascending (no offset last)
/// 3. name, Korean-aware
pub fn compare_entries(a: &PlaceEntry, b: &PlaceEntry) -> Ordering {
    stable_total_cmp_f64(a.episode, b.episode)
        .then_with(|| stable_total_cmp_f64(start_key(a), start_key(b)))
        .then_with(|| collate(&a.place.name, &b.place.name))
}

fn start_key(entry: &PlaceEntry) -> f64 {
    entry
        .place
        .video_start_seconds()
        .map(|s| s as f64)
        .unwrap_or(f64::INFINITY)
}

/// Stable in-place sort of visible indices into display order.
///
/// Indices missing from `world` sort last, keeping their relative order.
pub fn order_visible(world: &PlaceWorld, indices: &mut [PlaceIndex]) {
    indices.sort_by(|a, b| match (world.entry(*a), world.entry(*b)) {
        (Some(ea), Some(eb)) => compare_entries(ea, eb),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}
