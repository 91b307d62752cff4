//! Configuration for image extraction.
//!
//! The `ExtractionSettings` struct controls which sources are scanned,
//! which candidates are kept, and how long a scan may run. All fields
//! have documented defaults; a partially populated (or entirely absent)
//! settings object deserializes into the defaults for the missing fields.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default tags that never yield image candidates and are skipped outright.
pub const DEFAULT_IGNORED_TAGS: &[&str] = &[
    "script", "style", "link", "meta", "head", "title", "base", "noscript",
];

/// Default `data-*` name suffixes considered image-bearing (lazy loaders).
pub const DEFAULT_DATA_ATTRIBUTE_SUFFIXES: &[&str] = &[
    "src",
    "srcset",
    "original",
    "lazy",
    "lazy-src",
    "image",
    "img",
    "bg",
    "background",
    "thumb",
    "poster",
    "url",
];

/// Configuration options for a single extraction pass.
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for standard settings.
///
/// # Example
///
/// ```rust
/// use picscan::ExtractionSettings;
///
/// // Use defaults
/// let settings = ExtractionSettings::default();
///
/// // Customize specific fields
/// let settings = ExtractionSettings {
///     min_width: 100,
///     include_canvas: true,
///     ..ExtractionSettings::default()
/// };
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct ExtractionSettings {
    /// Minimum accepted width in pixels, applied only when a width
    /// could be resolved for the candidate.
    ///
    /// Default: `50`
    pub min_width: u32,

    /// Minimum accepted height in pixels, applied only when a height
    /// could be resolved for the candidate.
    ///
    /// Default: `50`
    pub min_height: u32,

    /// Advisory maximum file size in bytes, passed through to callers
    /// that download the results. Extraction itself never fetches.
    ///
    /// Default: `52_428_800` (50 MiB)
    pub max_file_size: u64,

    /// Scan `img`, `input[type=image]` and `source` elements.
    ///
    /// Default: `true`
    pub include_img_tags: bool,

    /// Scan inline and computed `background-image` plus `::before` /
    /// `::after` pseudo-element `content` values.
    ///
    /// Default: `true`
    pub include_backgrounds: bool,

    /// Serialize inline `<svg>` roots into data URIs.
    ///
    /// Default: `true`
    pub include_svg: bool,

    /// Take `poster` attributes from `video` elements.
    ///
    /// Default: `true`
    pub include_video_posters: bool,

    /// Read back `canvas` pixel buffers as data URIs. Off by default:
    /// expensive, and cross-origin content taints the canvas.
    ///
    /// Default: `false`
    pub include_canvas: bool,

    /// Scan `data-*` attributes used by lazy loaders.
    ///
    /// Default: `true`
    pub include_data_attributes: bool,

    /// Capture the element's `alt` text (falling back to `title`).
    ///
    /// Default: `true`
    pub include_alt_text: bool,

    /// Reject data URIs shorter than `min_data_url_length`. Filters
    /// tracking pixels and 1x1 placeholders.
    ///
    /// Default: `true`
    pub skip_small_data_urls: bool,

    /// Minimum length for a data URI to be kept when
    /// `skip_small_data_urls` is on.
    ///
    /// Default: `50`
    pub min_data_url_length: usize,

    /// Optional allowlist of format tokens (`"jpg"`, `"png"`, ...).
    /// When set, candidates with any other format are rejected,
    /// including `"unknown"` unless it is listed.
    ///
    /// Default: `None` (all formats accepted)
    pub allowed_formats: Option<Vec<String>>,

    /// Hard cap on the result set. The scan stops as soon as this many
    /// images have been accepted.
    ///
    /// Default: `1000`
    pub max_images_per_page: usize,

    /// Wall-clock deadline for the whole scan, in milliseconds.
    /// When exceeded the scan fails with a timeout and returns nothing.
    ///
    /// Default: `10_000`
    pub extraction_timeout_ms: u64,

    /// Tags skipped entirely during traversal.
    ///
    /// Default: [`DEFAULT_IGNORED_TAGS`]
    pub ignored_tags: Vec<String>,

    /// `data-*` name suffixes considered image-bearing. An attribute
    /// `data-lazy-src` matches the suffix `src` (and `lazy-src`).
    ///
    /// Default: [`DEFAULT_DATA_ATTRIBUTE_SUFFIXES`]
    pub data_attribute_suffixes: Vec<String>,

    /// URL of the page being scanned, used as the base for resolving
    /// relative candidate URLs and reported back in the page metadata.
    ///
    /// Default: `None`
    pub page_url: Option<String>,
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            min_width: 50,
            min_height: 50,
            max_file_size: 50 * 1024 * 1024,
            include_img_tags: true,
            include_backgrounds: true,
            include_svg: true,
            include_video_posters: true,
            include_canvas: false,
            include_data_attributes: true,
            include_alt_text: true,
            skip_small_data_urls: true,
            min_data_url_length: 50,
            allowed_formats: None,
            max_images_per_page: 1000,
            extraction_timeout_ms: 10_000,
            ignored_tags: DEFAULT_IGNORED_TAGS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            data_attribute_suffixes: DEFAULT_DATA_ATTRIBUTE_SUFFIXES
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            page_url: None,
        }
    }
}

impl ExtractionSettings {
    /// The scan deadline as a `Duration`.
    #[must_use]
    pub fn extraction_timeout(&self) -> Duration {
        Duration::from_millis(self.extraction_timeout_ms)
    }

    /// Whether `tag` (lowercase) is on the skip list.
    #[must_use]
    pub fn is_ignored_tag(&self, tag: &str) -> bool {
        self.ignored_tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Whether a `data-*` attribute name (without the `data-` prefix)
    /// is considered image-bearing.
    #[must_use]
    pub fn is_image_data_attribute(&self, name: &str) -> bool {
        self.data_attribute_suffixes
            .iter()
            .any(|suffix| name == suffix || name.ends_with(&format!("-{suffix}")))
    }

    /// Whether `format` passes the allowlist (if one is configured).
    #[must_use]
    pub fn is_allowed_format(&self, format: &str) -> bool {
        match &self.allowed_formats {
            Some(allowed) => allowed.iter().any(|f| f.eq_ignore_ascii_case(format)),
            None => true,
        }
    }
}
