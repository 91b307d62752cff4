//! Extraction orchestration.
//!
//! Parses the document, resolves the base URL for candidate
//! normalization, runs the scanner under the configured deadline, and
//! assembles the page report handed back to the caller.

use std::time::Instant;

use chrono::Utc;
use dom_query::{Document, Selection};
use tracing::debug;
use url::Url;

use crate::dom;
use crate::error::Result;
use crate::layout::LayoutProvider;
use crate::record::{ExtractionReport, PageInfo};
use crate::scanner;
use crate::settings::ExtractionSettings;

pub(crate) fn extract_images_impl(
    html: &str,
    settings: &ExtractionSettings,
    layout: &dyn LayoutProvider,
) -> Result<ExtractionReport> {
    let deadline = Instant::now() + settings.extraction_timeout();
    let document = Document::from(html);

    let base = resolve_base_url(&document, settings);
    debug!(base = ?base.as_ref().map(Url::as_str), "resolved base url");

    let images = scanner::scan_document(&document, base.as_ref(), settings, layout, deadline)?;
    let page = page_info(&document, settings);

    Ok(ExtractionReport { images, page })
}

/// Base URL for resolving relative candidates: the configured page URL,
/// overridden by a `<base href>` element when present (itself resolved
/// against the page URL if relative).
fn resolve_base_url(doc: &Document, settings: &ExtractionSettings) -> Option<Url> {
    let page = settings
        .page_url
        .as_deref()
        .and_then(|u| Url::parse(u).ok());

    if let Some(node) = doc.select("base[href]").nodes().first() {
        let sel = Selection::from(*node);
        if let Some(href) = dom::get_attribute(&sel, "href") {
            let resolved = match &page {
                Some(page_url) => page_url.join(&href).ok(),
                None => Url::parse(&href).ok(),
            };
            if resolved.is_some() {
                return resolved;
            }
        }
    }

    page
}

/// Page metadata for the report: title element text plus the canonical
/// URL chain (`link[rel=canonical]`, `og:url`, configured page URL).
fn page_info(doc: &Document, settings: &ExtractionSettings) -> PageInfo {
    let title = {
        let sel = doc.select("title");
        let text = dom::text_content(&sel);
        let text = text.trim();
        if text.is_empty() {
            None
        } else {
            Some(text.to_string())
        }
    };

    let mut url = None;
    if let Some(node) = doc.select("link[rel='canonical']").nodes().first() {
        url = dom::get_attribute(&Selection::from(*node), "href").filter(|u| !u.is_empty());
    }
    if url.is_none() {
        if let Some(node) = doc.select("meta[property='og:url']").nodes().first() {
            url = dom::get_attribute(&Selection::from(*node), "content").filter(|u| !u.is_empty());
        }
    }
    if url.is_none() {
        url = settings.page_url.clone();
    }

    PageInfo {
        title,
        url,
        extracted_at: Utc::now(),
    }
}
