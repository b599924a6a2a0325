pub mod labels;
pub mod layer;
pub mod symbology;

pub use labels::{DeclutterConfig, DeclutterOutcome, LabelGeometry, declutter};
pub use layer::{MarkerDelta, MarkerLayer};
pub use symbology::{ALL_CATEGORIES_SWATCH, MarkerSpec, MarkerStyle};
