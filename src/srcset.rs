//! Responsive `srcset` attribute parsing.
//!
//! A `srcset` value is a comma-separated list of candidate descriptors,
//! each a URL optionally followed by a width (`480w`) or density (`2x`)
//! descriptor. We return the URLs only; descriptors affect ordering, not
//! selection, since every valid unique candidate is kept downstream.

/// Parse a `srcset` attribute into its candidate URLs.
///
/// URLs are returned in reverse declaration order so that the entry
/// presumed to reference the largest asset is considered first. That
/// only matters when the per-page cap truncates the scan, in which case
/// earlier-discovered candidates are favored.
#[must_use]
pub fn parse_srcset(srcset: &str) -> Vec<String> {
    let mut urls: Vec<String> = srcset
        .split(',')
        .filter_map(|candidate| {
            let url = candidate.trim().split_whitespace().next()?;
            if url.is_empty() {
                None
            } else {
                Some(url.to_string())
            }
        })
        .collect();

    urls.reverse();
    urls
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_descriptors_reversed() {
        assert_eq!(
            parse_srcset("a.jpg 480w, b.jpg 960w"),
            vec!["b.jpg".to_string(), "a.jpg".to_string()]
        );
    }

    #[test]
    fn density_descriptors() {
        assert_eq!(
            parse_srcset("low.png 1x, high.png 2x"),
            vec!["high.png".to_string(), "low.png".to_string()]
        );
    }

    #[test]
    fn bare_url() {
        assert_eq!(parse_srcset("only.webp"), vec!["only.webp".to_string()]);
    }

    #[test]
    fn empty_and_whitespace() {
        assert!(parse_srcset("").is_empty());
        assert!(parse_srcset("  ,  ,").is_empty());
    }

    #[test]
    fn messy_whitespace() {
        assert_eq!(
            parse_srcset("  a.jpg   480w ,\n  b.jpg 960w  "),
            vec!["b.jpg".to_string(), "a.jpg".to_string()]
        );
    }
}
