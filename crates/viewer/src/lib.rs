//! Interactive place map core: view state, the map/list contracts and the
//! synchronizer that drives them.

pub mod camera;
pub mod config;
pub mod detail;
pub mod state;
pub mod sync;

pub use camera::{FitOptions, InitialView, fly_zoom, visible_bounds};
pub use config::{ConfigError, ViewerConfig};
pub use detail::{
    ALL_CATEGORIES_LABEL, CategoryChip, ChipKey, EMPTY_RESULTS, NO_DESCRIPTION, PlaceRow,
    PopupDetail,
};
pub use state::{Effects, SelectOrigin, ViewState};
pub use sync::{ListSurface, LoadSummary, MapWidget, Viewer};
