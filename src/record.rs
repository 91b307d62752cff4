//! Output records for image extraction.
//!
//! This module defines the durable records produced by a scan: the
//! per-image record, the page metadata, and the response payload shape
//! used when handing results across a message boundary.
//!
//! Wire field names are deliberately short (`u`, `w`, `h`, ...) because
//! result sets routinely carry hundreds of records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Where a candidate URL was discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageSource {
    /// `img` element `src` (also `input[type=image]`).
    #[serde(rename = "img")]
    Img,
    /// A responsive `srcset` entry on an `img` or `source` element.
    #[serde(rename = "srcset")]
    Srcset,
    /// CSS `background-image` or pseudo-element `content`.
    #[serde(rename = "bg")]
    Background,
    /// Inline `<svg>` subtree serialized to a data URI.
    #[serde(rename = "svg")]
    Svg,
    /// `video` element `poster`.
    #[serde(rename = "video")]
    VideoPoster,
    /// `canvas` pixel read-back (opt-in).
    #[serde(rename = "canvas")]
    Canvas,
    /// Lazy-load `data-*` attribute.
    #[serde(rename = "data")]
    DataAttribute,
}

/// One extracted image.
///
/// `url` is the deduplication key: within a result set every record's
/// resolved URL is unique. `format` and `source` are always populated
/// (`format` falls back to `"unknown"`); dimensions and alt text are
/// optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedImage {
    /// Resolved absolute URL (or data URI).
    #[serde(rename = "u")]
    pub url: String,

    /// Effective width in whole pixels, when one could be resolved.
    #[serde(rename = "w", skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    /// Effective height in whole pixels, when one could be resolved.
    #[serde(rename = "h", skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,

    /// Alt text (falling back to the `title` attribute), when enabled.
    #[serde(rename = "a", skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,

    /// Lowercase format token: a file extension, a data URI MIME
    /// subtype, or `"unknown"`.
    #[serde(rename = "f")]
    pub format: String,

    /// Which extraction rule produced this record.
    #[serde(rename = "s")]
    pub source: ImageSource,

    /// Whether the owning element is currently, or imminently, visible
    /// in the viewport.
    #[serde(rename = "v")]
    pub visible: bool,
}

/// Metadata about the scanned page, handed off alongside the images.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageInfo {
    /// Page title from the `<title>` element.
    pub title: Option<String>,

    /// Canonical page URL (`link[rel=canonical]`, `og:url`, or the
    /// configured page URL).
    pub url: Option<String>,

    /// When the scan ran.
    pub extracted_at: DateTime<Utc>,
}

/// The full output of one extraction pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionReport {
    /// Deduplicated, size-bounded image records in discovery order.
    pub images: Vec<ExtractedImage>,

    /// Page metadata.
    pub page: PageInfo,
}

/// Response payload for callers on the other side of a message boundary.
///
/// Mirrors the inbound/outbound contract of the surrounding runtime:
/// a success payload with the records, or a failure payload with an
/// error classification. An empty result set is mapped to the
/// `"No images found"` failure here (the library API itself returns
/// `Ok` with an empty list).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractResponse {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<ExtractedImage>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<PageInfo>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExtractResponse {
    /// Build the payload from an extraction result.
    #[must_use]
    pub fn from_result(result: crate::Result<ExtractionReport>) -> Self {
        match result {
            Ok(report) if report.images.is_empty() => Self {
                success: false,
                images: None,
                page: Some(report.page),
                error: Some(Error::NoImages.to_string()),
            },
            Ok(report) => Self {
                success: true,
                images: Some(report.images),
                page: Some(report.page),
                error: None,
            },
            Err(err) => Self {
                success: false,
                images: None,
                page: None,
                error: Some(err.to_string()),
            },
        }
    }
}
