//! # picscan
//!
//! Universal page image extraction library.
//!
//! picscan scans a parsed HTML document once, in document order, and
//! collects image candidates from heterogeneous sources: `img`/`source`
//! tags and their `srcset` entries, `input[type=image]` buttons, CSS
//! backgrounds and pseudo-element content, lazy-load `data-*`
//! attributes, `video` posters, inline SVG roots, and (opt-in) canvas
//! read-back. Candidates are normalized against the page's base URL,
//! screened, classified by format, sized through per-source fallback
//! chains, deduplicated by resolved URL, and returned as a bounded
//! result set under a wall-clock deadline.
//!
//! ## Quick Start
//!
//! ```rust
//! use picscan::extract_images;
//!
//! let html = r#"<html><head><title>Gallery</title></head>
//! <body><img src="https://example.com/photo.jpg" alt="A photo"></body></html>"#;
//!
//! let report = extract_images(html)?;
//! assert_eq!(report.images.len(), 1);
//! assert_eq!(report.images[0].format, "jpg");
//! # Ok::<(), picscan::Error>(())
//! ```
//!
//! ## Layout
//!
//! Dimension resolution and viewport visibility depend on live layout
//! measurement that only a renderer can provide. That capability is
//! injected through [`layout::LayoutProvider`]; without one, extraction
//! still works from attributes alone (see [`layout::StaticLayout`]),
//! and tests use [`layout::FixtureLayout`] as a synthetic renderer.

mod error;
mod extract;
mod record;
mod settings;

pub(crate) mod patterns;
pub(crate) mod scanner;

/// DOM operations adapter over `dom_query`.
pub mod dom;

/// CSS property value parsing (`url(...)` extraction).
pub mod css;

/// Character encoding detection and transcoding.
pub mod encoding;

/// Layout and computed-style abstraction (providers and fixtures).
pub mod layout;

/// Responsive `srcset` attribute parsing.
pub mod srcset;

/// URL resolution, screening and format classification.
pub mod url_utils;

// Public API - re-exports
pub use error::{Error, Result};
pub use record::{ExtractResponse, ExtractedImage, ExtractionReport, ImageSource, PageInfo};
pub use settings::ExtractionSettings;

use layout::{LayoutProvider, StaticLayout};

/// Extract all images from an HTML document using default settings.
///
/// Runs without layout information: dimensions come from attributes
/// only and every visibility flag is `false`. An empty result list is
/// `Ok`, not an error.
pub fn extract_images(html: &str) -> Result<ExtractionReport> {
    extract_images_with_settings(html, &ExtractionSettings::default())
}

/// Extract all images from an HTML document with custom settings.
///
/// # Example
///
/// ```rust
/// use picscan::{extract_images_with_settings, ExtractionSettings};
///
/// let html = r#"<img src="https://example.com/a.png">"#;
/// let settings = ExtractionSettings {
///     page_url: Some("https://example.com/".to_string()),
///     min_width: 0,
///     min_height: 0,
///     ..ExtractionSettings::default()
/// };
/// let report = extract_images_with_settings(html, &settings)?;
/// # Ok::<(), picscan::Error>(())
/// ```
pub fn extract_images_with_settings(
    html: &str,
    settings: &ExtractionSettings,
) -> Result<ExtractionReport> {
    extract::extract_images_impl(html, settings, &StaticLayout)
}

/// Extract all images with custom settings and an injected layout
/// provider.
///
/// This is the full entry point: the provider supplies bounding boxes,
/// computed styles, intrinsic sizes and canvas pixel data, enabling the
/// dimension fallback chains and the viewport-visibility heuristic.
pub fn extract_images_with_layout(
    html: &str,
    settings: &ExtractionSettings,
    layout: &dyn LayoutProvider,
) -> Result<ExtractionReport> {
    extract::extract_images_impl(html, settings, layout)
}

/// Extract all images from HTML bytes with automatic encoding detection.
///
/// Detects the character encoding from meta tags and converts to UTF-8
/// before extraction. Invalid characters are replaced rather than
/// causing errors.
pub fn extract_images_bytes(html: &[u8]) -> Result<ExtractionReport> {
    let html_str = encoding::transcode_to_utf8(html);
    extract_images(&html_str)
}

/// Extract all images from HTML bytes with custom settings and
/// automatic encoding detection.
pub fn extract_images_bytes_with_settings(
    html: &[u8],
    settings: &ExtractionSettings,
) -> Result<ExtractionReport> {
    let html_str = encoding::transcode_to_utf8(html);
    extract_images_with_settings(&html_str, settings)
}
