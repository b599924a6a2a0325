pub mod category;
pub mod classify;
pub mod collate;
pub mod normalize;
pub mod order;
pub mod place;
pub mod query;
pub mod selection;
pub mod video;
pub mod world;

pub use category::CategoryIndex;
pub use classify::{EPISODE_PALETTE, NO_EPISODE, category_hash, color_for, parse_episode};
pub use collate::collate;
pub use normalize::{
    DropReason, DroppedRecord, NormalizeConfig, NormalizeReport, Normalizer, UNCATEGORIZED,
};
pub use order::{compare_entries, order_visible};
pub use place::Place;
pub use query::{VisibilityFilter, normalize_query};
pub use selection::SelectionSet;
pub use video::{OverrideError, VideoLink, VideoOverrideEntry, VideoOverrides};
pub use world::{PlaceEntry, PlaceIndex, PlaceWorld};

#[cfg(test)]
pub(crate) mod test_support {
    use foundation::{LatLon, PlaceId};

    use crate::place::Place;
    use crate::video::VideoLink;

    pub fn place(id: &str, category: &str, name: &str) -> Place {
        Place {
            id: PlaceId::new(id),
            category: category.to_string(),
            name: name.to_string(),
            description: String::new(),
            position: LatLon::new(35.0, 129.0),
            video: None,
            frame_image: None,
        }
    }

    pub fn place_with_description(id: &str, category: &str, name: &str, description: &str) -> Place {
        Place {
            description: description.to_string(),
            ..place(id, category, name)
        }
    }

    pub fn place_with_start(id: &str, category: &str, name: &str, start: Option<u64>) -> Place {
        Place {
            video: start.map(|s| VideoLink::new(format!("https://youtu.be/v{id}"), Some(s))),
            ..place(id, category, name)
        }
    }
}
