//! Extraction of image URLs from CSS property values.
//!
//! Handles the two shapes found in the wild: `url(...)` tokens (from
//! `background-image` and pseudo-element `content`) and `content`
//! values that are just a quoted URL string.

use crate::patterns::{CSS_QUOTED_CONTENT, CSS_URL};
use crate::url_utils::is_valid_image_url;

/// Pull a candidate URL out of a CSS property value.
///
/// Returns `None` for `none`, gradients without `url()`, empty values,
/// and quoted content that does not look like a URL.
#[must_use]
pub fn extract_css_url(value: &str) -> Option<String> {
    if let Some(captures) = CSS_URL.captures(value) {
        let url = captures.get(1)?.as_str();
        if url.is_empty() {
            return None;
        }
        return Some(url.to_string());
    }

    // content: "https://..." without a url() wrapper
    let quoted = CSS_QUOTED_CONTENT.captures(value)?.get(1)?.as_str();
    if is_valid_image_url(quoted) {
        return Some(quoted.to_string());
    }

    None
}
