pub mod features;
pub mod model;
pub mod registry;

pub use features::{prepare_features, MIN_BARS};
pub use model::{FeatureWidth, LinearModel};
pub use registry::{InstrumentModel, ModelRegistry};
