//! Resolves the images of a rendered gallery and feeds the outcome back into
//! the page, the way a browser reports `load`/`error` per image.

use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

use crate::dom::Document;
use crate::store::ResourceSource;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProbeReport {
    pub loaded: usize,
    pub failed: usize,
}

/// Fetches every pending image, at most `concurrency` at a time.
///
/// Fetches complete in any order; each result only touches its own tile.
/// `on_progress(done, total)` runs after each result is applied.
pub async fn probe_images<R, F>(
    page: &mut Document,
    source: &R,
    concurrency: usize,
    mut on_progress: F,
) -> ProbeReport
where
    R: ResourceSource + ?Sized,
    F: FnMut(usize, usize),
{
    let pending = page.pending_images();
    let total = pending.len();
    let mut report = ProbeReport::default();

    let mut results = stream::iter(pending)
        .map(|(node, src)| async move {
            let result = source.fetch(&src).await;
            (node, src, result)
        })
        .buffer_unordered(concurrency.max(1));

    while let Some((node, src, result)) = results.next().await {
        match result {
            Ok(bytes) => {
                debug!(%src, bytes, "image loaded");
                page.image_loaded(node);
                report.loaded += 1;
            }
            Err(err) => {
                warn!(error = %err, "image failed to load");
                page.image_failed(node);
                report.failed += 1;
            }
        }
        on_progress(report.loaded + report.failed, total);
    }

    report
}
