//! Gallery load cycle: fetch the file list, build one tile per path and swap
//! the result into the page container.

use tracing::{debug, error, info};

use crate::dom::{element, text_element, Page};
use crate::error::{GalleryError, RequestError};
use crate::model::{FilePath, GalleryItemView};
use crate::store::ListSource;

pub const DEFAULT_CONTAINER_ID: &str = "gallery-container";
pub const EMPTY_MESSAGE: &str = "No images uploaded yet. Upload your first image above!";
pub const ITEM_FAILURE_LABEL: &str = "Failed to load image";
const FAILURE_COLOR: &str = "color: #e74c3c";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Rendered(Vec<GalleryItemView>),
    Empty,
    Failed { message: String },
}

impl LoadState {
    pub fn is_failed(&self) -> bool {
        matches!(self, LoadState::Failed { .. })
    }
}

pub struct GalleryLoader<S> {
    source: S,
}

impl<S: ListSource> GalleryLoader<S> {
    pub fn new(source: S) -> Self {
        GalleryLoader { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// The list request on its own, without touching any page.
    pub async fn fetch(&self) -> Result<Vec<FilePath>, RequestError> {
        self.source.list().await
    }

    /// Runs one load cycle against `page`.
    ///
    /// Request failures are rendered into the container and reported as
    /// [`LoadState::Failed`]; only a page without a container is an `Err`.
    pub async fn load(&self, page: &mut dyn Page) -> Result<LoadState, GalleryError> {
        let container = page.container().ok_or(GalleryError::ContainerMissing)?;
        debug!(state = ?LoadState::Loading, "loading gallery");

        let state = match self.fetch().await {
            Ok(paths) if paths.is_empty() => {
                let message = text_element(page, "div", "empty-gallery", EMPTY_MESSAGE);
                page.set_content(container, vec![message]);
                LoadState::Empty
            }
            Ok(paths) => {
                let gallery = element(page, "div", "gallery");
                let items: Vec<GalleryItemView> = paths
                    .iter()
                    .map(|path| {
                        let item = build_item(page, path);
                        page.append_child(gallery, item.node);
                        item
                    })
                    .collect();

                page.set_content(container, vec![gallery]);
                LoadState::Rendered(items)
            }
            Err(err) => {
                error!(error = %err, "Error loading gallery");
                let message = format!("Failed to load images: {}", err);
                let node = text_element(page, "div", "error", &message);
                page.set_content(container, vec![node]);
                LoadState::Failed { message }
            }
        };

        match &state {
            LoadState::Rendered(items) => info!(items = items.len(), "gallery rendered"),
            LoadState::Empty => info!("gallery is empty"),
            _ => {}
        }
        Ok(state)
    }
}

/// Builds the tile for one path: image plus name label, with a fallback that
/// hides the image and flags this tile alone if the image fails to load.
pub fn build_item(page: &mut dyn Page, path: &FilePath) -> GalleryItemView {
    let name = path.display_name().to_owned();
    let src = path.resource_src();

    let node = element(page, "div", "gallery-item");

    let image = page.create_element("img");
    page.set_attribute(image, "src", &src);
    page.set_attribute(image, "alt", &name);
    page.set_attribute(image, "loading", "lazy");
    page.on_load_failure(
        image,
        Box::new(move |page: &mut dyn Page| {
            page.set_attribute(image, "style", "display: none");
            let label = text_element(page, "div", "filename", ITEM_FAILURE_LABEL);
            page.set_attribute(label, "style", FAILURE_COLOR);
            page.append_child(node, label);
        }),
    );

    let label = text_element(page, "div", "filename", &name);
    page.append_child(node, image);
    page.append_child(node, label);

    GalleryItemView {
        path: path.clone(),
        name,
        src,
        node,
        image,
        label,
    }
}
