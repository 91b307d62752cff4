//! Error types for picscan.
//!
//! This module defines the error types returned by image extraction
//! operations. Per-candidate and per-element failures are absorbed inside
//! the scanner; only whole-scan failures surface here.

use std::time::Duration;

/// Error type for extraction operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The scan did not finish before the configured deadline.
    ///
    /// No partial result is returned when this fires.
    #[error("extraction timed out after {0:?}")]
    Timeout(Duration),

    /// No images were found on the page.
    ///
    /// The library itself treats an empty result as `Ok`; this variant
    /// exists for callers that surface empty results as failures
    /// (see [`crate::ExtractResponse`]).
    #[error("no images found")]
    NoImages,

    /// General extraction failure.
    #[error("extraction failed: {0}")]
    ExtractionError(String),
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;
