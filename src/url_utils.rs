//! URL utilities for candidate normalization and classification.
//!
//! This module handles the three URL concerns of the extraction pipeline:
//! resolving raw candidate strings into absolute URLs, screening
//! untrusted strings against the accepted URL shapes, and classifying a
//! URL's image format.

use url::Url;

use crate::patterns::{DATA_IMAGE_SUBTYPE, PATH_EXTENSION, VALID_IMAGE_URL};

/// Format token used when no recognizable suffix or MIME subtype exists.
pub const UNKNOWN_FORMAT: &str = "unknown";

/// Check if a string is a valid absolute http(s) URL.
///
/// # Returns
/// * `(is_absolute, parsed_url)` - Whether the URL is absolute and the parsed URL if valid
#[must_use]
pub fn is_absolute_url(s: &str) -> (bool, Option<Url>) {
    let s = s.trim();

    if s.is_empty() {
        return (false, None);
    }

    if !s.starts_with("http://") && !s.starts_with("https://") {
        return (false, None);
    }

    match Url::parse(s) {
        Ok(url) => {
            if url.host().is_some() {
                (true, Some(url))
            } else {
                (false, None)
            }
        }
        Err(_) => (false, None),
    }
}

/// Resolve a raw candidate string into an absolute URL.
///
/// Handles, in order:
/// * data URIs — preserved unchanged
/// * protocol-relative `//host/path` — given the base URL's scheme
///   (`https` when no base is available)
/// * already-absolute http(s) URLs — returned as-is
/// * relative and root-relative paths — joined against the base
///
/// Resolution failure falls back to the raw string unmodified rather
/// than failing the candidate.
#[must_use]
pub fn resolve_candidate_url(raw: &str, base: Option<&Url>) -> String {
    let raw = raw.trim();

    if raw.is_empty() || raw.starts_with("data:") {
        return raw.to_string();
    }

    if let Some(rest) = raw.strip_prefix("//") {
        let scheme = base.map_or("https", Url::scheme);
        return format!("{scheme}://{rest}");
    }

    let (is_abs, _) = is_absolute_url(raw);
    if is_abs {
        return raw.to_string();
    }

    match base {
        Some(base_url) => match base_url.join(raw) {
            Ok(resolved) => resolved.to_string(),
            Err(_) => raw.to_string(),
        },
        None => raw.to_string(),
    }
}

/// Screen an untrusted string against the accepted URL shapes.
///
/// Accepts full http(s) URLs, root-relative paths, and data URIs.
/// Strings shorter than 4 characters are always rejected.
#[must_use]
pub fn is_valid_image_url(url: &str) -> bool {
    if url.len() < 4 {
        return false;
    }
    VALID_IMAGE_URL.is_match(url)
}

/// Strip query parameters and fragment identifiers from a URL.
#[must_use]
pub fn strip_query_fragment(url: &str) -> &str {
    let without_query = url.split('?').next().unwrap_or(url);
    without_query.split('#').next().unwrap_or(without_query)
}

/// Classify a URL's image format.
///
/// Data URIs yield their MIME subtype (`data:image/png;...` -> `"png"`);
/// other URLs yield the lowercased file-extension-like suffix of their
/// path with query string and fragment stripped first. Returns
/// [`UNKNOWN_FORMAT`] when neither applies.
#[must_use]
pub fn image_format(url: &str) -> String {
    if url.starts_with("data:") {
        return DATA_IMAGE_SUBTYPE
            .captures(url)
            .and_then(|c| c.get(1))
            .map_or_else(|| UNKNOWN_FORMAT.to_string(), |m| m.as_str().to_lowercase());
    }

    let path = strip_query_fragment(url);
    PATH_EXTENSION
        .captures(path)
        .and_then(|c| c.get(1))
        .map_or_else(|| UNKNOWN_FORMAT.to_string(), |m| m.as_str().to_lowercase())
}
