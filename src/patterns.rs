//! Compiled regex patterns for candidate URL screening and classification.
//!
//! All patterns are compiled once at startup using `LazyLock` for
//! efficiency. These implement the strict URL-shape validation variant:
//! full http(s) URLs, root-relative paths (but not protocol-relative
//! `//`), and data URIs.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

/// Accepted candidate URL shapes: `http://...`, `https://...`, a
/// root-relative path (`/x` but not `//x`), or a data URI.
///
/// Applied to untrusted sources (data attributes, CSS values) after
/// protocol-relative normalization; element-intrinsic attributes
/// (`src`, `srcset`, `poster`) skip this screen.
pub static VALID_IMAGE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(https?://|/[^/]|data:)").expect("VALID_IMAGE_URL regex"));

/// Extracts the URL out of a CSS `url(...)` token, with optional quotes.
pub static CSS_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"url\(['"]?([^'")]*)['"]?\)"#).expect("CSS_URL regex"));

/// Matches a CSS `content` value that is just a quoted string (possibly
/// a bare URL without the `url(...)` wrapper).
pub static CSS_QUOTED_CONTENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^["']?([^"']+)["']?$"#).expect("CSS_QUOTED_CONTENT regex"));

/// Captures the MIME subtype of an image data URI.
pub static DATA_IMAGE_SUBTYPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^data:image/([^;,]+)").expect("DATA_IMAGE_SUBTYPE regex"));

/// Captures a file-extension-like suffix at the end of a URL path.
pub static PATH_EXTENSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.([a-zA-Z0-9]+)$").expect("PATH_EXTENSION regex"));
