//! Single-pass DOM traversal for image candidates.
//!
//! Walks every element in document order exactly once, applies the
//! enabled extraction rules, funnels each discovered candidate through
//! the candidate builder, and aggregates accepted records with
//! first-wins URL deduplication and a hard result cap. The whole pass
//! runs under a wall-clock deadline; expiry aborts with no partial
//! result.

mod candidate;
mod rules;

use std::collections::HashSet;
use std::time::Instant;

use dom_query::{Document, Selection};
use tracing::{debug, info};
use url::Url;

use crate::dom;
use crate::error::{Error, Result};
use crate::layout::LayoutProvider;
use crate::record::ExtractedImage;
use crate::settings::ExtractionSettings;

/// Aggregation state for one scan. Local to a single invocation, so
/// re-entrant and concurrent scans never share counters.
struct ScanState {
    images: Vec<ExtractedImage>,
    seen_urls: HashSet<String>,
}

impl ScanState {
    fn new() -> Self {
        Self {
            images: Vec::new(),
            seen_urls: HashSet::new(),
        }
    }

    fn is_full(&self, settings: &ExtractionSettings) -> bool {
        self.images.len() >= settings.max_images_per_page
    }

    /// First occurrence wins; later duplicates are dropped silently.
    fn push(&mut self, image: ExtractedImage) {
        if self.seen_urls.contains(&image.url) {
            debug!(url = %image.url, "duplicate url dropped");
            return;
        }
        self.seen_urls.insert(image.url.clone());
        self.images.push(image);
    }
}

/// Scan every element of the document, in document order, under the
/// given deadline.
pub(crate) fn scan_document(
    doc: &Document,
    base: Option<&Url>,
    settings: &ExtractionSettings,
    layout: &dyn LayoutProvider,
    deadline: Instant,
) -> Result<Vec<ExtractedImage>> {
    let mut state = ScanState::new();

    let all = doc.select("*");
    let nodes = all.nodes();
    debug!(elements = nodes.len(), "scanning document");

    for node in nodes {
        if state.is_full(settings) {
            info!(limit = settings.max_images_per_page, "hit max images limit");
            break;
        }
        if Instant::now() >= deadline {
            info!("extraction deadline exceeded");
            return Err(Error::Timeout(settings.extraction_timeout()));
        }

        let element = Selection::from(*node);
        let Some(tag) = dom::tag_name(&element) else {
            continue;
        };
        if settings.is_ignored_tag(&tag) {
            continue;
        }

        scan_element(&element, &tag, base, settings, layout, &mut state);
    }

    info!(
        images = state.images.len(),
        visible = state.images.iter().filter(|i| i.visible).count(),
        "scan complete"
    );
    Ok(state.images)
}

fn scan_element(
    element: &Selection<'_>,
    tag: &str,
    base: Option<&Url>,
    settings: &ExtractionSettings,
    layout: &dyn LayoutProvider,
    state: &mut ScanState,
) {
    for found in rules::element_candidates(element, tag, settings, layout) {
        if state.is_full(settings) {
            return;
        }
        if !candidate::screen(&found, settings) {
            continue;
        }
        if let Some(image) = candidate::build_image(&found, element, tag, base, settings, layout)
        {
            state.push(image);
        }
    }
}
