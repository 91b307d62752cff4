//! Character encoding detection and transcoding.
//!
//! Pages saved or fetched as raw bytes declare their charset in meta
//! tags; this module detects the declaration and converts the document
//! to UTF-8 before it is parsed and scanned.

use std::sync::LazyLock;

use encoding_rs::{Encoding, UTF_8};
use regex::Regex;

/// Match `<meta charset="...">` tag
#[allow(clippy::expect_used)]
static CHARSET_META_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([^"'\s>]+)"#).expect("valid regex")
});

/// Match `<meta http-equiv="Content-Type" content="...; charset=...">` tag
#[allow(clippy::expect_used)]
static CONTENT_TYPE_CHARSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+http-equiv\s*=\s*["']?content-type["']?[^>]+content\s*=\s*["']?[^"'>]*;\s*charset\s*=\s*([^"'\s>]+)"#).expect("valid regex")
});

/// Detect character encoding from HTML bytes.
///
/// Looks for charset declarations in the first 1024 bytes only, in the
/// order `<meta charset>`, `<meta http-equiv>`, and defaults to UTF-8
/// when no declaration is found.
#[must_use]
pub fn detect_encoding(html: &[u8]) -> &'static Encoding {
    let head = &html[..html.len().min(1024)];
    let head_str = String::from_utf8_lossy(head);

    for pattern in [&CHARSET_META_RE, &CONTENT_TYPE_CHARSET_RE] {
        if let Some(label) = pattern.captures(&head_str).and_then(|c| c.get(1)) {
            if let Some(encoding) = Encoding::for_label(label.as_str().as_bytes()) {
                return encoding;
            }
        }
    }

    UTF_8
}

/// Transcode HTML bytes to a UTF-8 string.
///
/// Invalid characters are replaced with the Unicode replacement
/// character rather than causing errors.
///
/// # Examples
///
/// ```
/// use picscan::encoding::transcode_to_utf8;
///
/// let html = b"<html><body><img src=\"a.jpg\"></body></html>";
/// let utf8 = transcode_to_utf8(html);
/// assert!(utf8.contains("a.jpg"));
/// ```
#[must_use]
pub fn transcode_to_utf8(html: &[u8]) -> String {
    let encoding = detect_encoding(html);

    if encoding == UTF_8 {
        return String::from_utf8_lossy(html).into_owned();
    }

    let (decoded, _encoding_used, _had_errors) = encoding.decode(html);
    decoded.into_owned()
}
