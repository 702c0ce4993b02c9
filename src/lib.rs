pub mod dom;
pub mod error;
pub mod http_store;
pub mod loader;
pub mod model;
pub mod probe;
pub mod render;
pub mod store;

pub use dom::{Document, NodeId, Page};
pub use error::{GalleryError, RequestError, ResourceLoadError};
pub use http_store::HttpStore;
pub use loader::{build_item, GalleryLoader, LoadState};
pub use model::{FilePath, GalleryItemView};
pub use probe::{probe_images, ProbeReport};
pub use render::{render_gallery, RenderOptions, RenderOutcome};
pub use store::{ListSource, ResourceSource};
