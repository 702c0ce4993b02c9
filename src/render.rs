//! One `render` run: load the gallery into a fresh page, optionally resolve
//! its images, and write the page out.

use std::path::PathBuf;

use tracing::info;

use crate::dom::Document;
use crate::error::GalleryError;
use crate::loader::{GalleryLoader, LoadState, DEFAULT_CONTAINER_ID};
use crate::probe::{probe_images, ProbeReport};
use crate::store::{ListSource, ResourceSource};

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub output: PathBuf,
    pub container_id: String,
    pub title: String,
    pub probe: bool,
    pub concurrency: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            output: PathBuf::from("gallery.html"),
            container_id: DEFAULT_CONTAINER_ID.to_owned(),
            title: "Gallery".to_owned(),
            probe: false,
            concurrency: 8,
        }
    }
}

#[derive(Debug)]
pub struct RenderOutcome {
    pub state: LoadState,
    pub probe: Option<ProbeReport>,
    pub output: PathBuf,
}

impl RenderOutcome {
    /// False when the page shows the load error instead of a gallery.
    pub fn succeeded(&self) -> bool {
        !self.state.is_failed()
    }
}

/// The page is written whatever the load outcome, so a failed load still
/// leaves its error message on disk.
pub async fn render_gallery<S, F>(
    store: &S,
    options: &RenderOptions,
    on_progress: F,
) -> Result<RenderOutcome, GalleryError>
where
    S: ListSource + ResourceSource + Clone,
    F: FnMut(usize, usize),
{
    let mut page = Document::new(&options.container_id);
    let loader = GalleryLoader::new(store.clone());

    let state = loader.load(&mut page).await?;
    let probe = match &state {
        LoadState::Rendered(_) if options.probe => {
            Some(probe_images(&mut page, store, options.concurrency, on_progress).await)
        }
        _ => None,
    };

    tokio::fs::write(&options.output, page.render_page(&options.title)?).await?;
    info!(output = %options.output.display(), "page written");

    Ok(RenderOutcome {
        state,
        probe,
        output: options.output.clone(),
    })
}
