//! Editor component: text models keyed by URI, preview surfaces and the
//! single viewport that shows one of them.

mod model;
mod registry;
mod viewport;

pub use model::{ModelUri, PreviewSurface, TextModel, ViewState};
pub use registry::{ModelError, ModelId, ModelRegistry, PreviewId};
pub use viewport::{Surface, Viewport};
