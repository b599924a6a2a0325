use foundation::{LatLon, PlaceId};

use crate::video::VideoLink;

/// A normalized, geo-tagged place.
///
/// Invariants (established by [`crate::normalize::Normalizer`]):
/// - `category` is never empty or whitespace-only.
/// - `position` is finite.
/// - a start offset only exists inside a [`VideoLink`], so it always comes
///   with a URL.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub id: PlaceId,
    pub category: String,
    pub name: String,
    pub description: String,
    pub position: LatLon,
    pub video: Option<VideoLink>,
    /// Relative path of a captured still frame for the video timestamp.
    pub frame_image: Option<String>,
}

impl Place {
    pub fn video_url(&self) -> Option<&str> {
        self.video.as_ref().map(|v| v.url.as_str())
    }

    pub fn video_start_seconds(&self) -> Option<u64> {
        self.video.as_ref().and_then(|v| v.start_seconds)
    }

    pub fn video_start_label(&self) -> Option<&str> {
        self.video.as_ref().and_then(|v| v.start_label.as_deref())
    }
}
