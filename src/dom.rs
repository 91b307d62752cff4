//! DOM operations adapter.
//!
//! Thin helpers over the `dom_query` crate giving the scanner a small,
//! consistent surface for the element operations it needs: attribute
//! access, tag names, attribute enumeration, and subtree serialization.

// Re-export core types for external use
pub use dom_query::{Document, Selection};

/// Get any attribute value.
#[inline]
#[must_use]
pub fn get_attribute(sel: &Selection, name: &str) -> Option<String> {
    sel.attr(name).map(|s| s.to_string())
}

/// Check if an attribute exists.
#[inline]
#[must_use]
pub fn has_attribute(sel: &Selection, name: &str) -> bool {
    sel.has_attr(name)
}

/// Get tag name (lowercase).
#[must_use]
pub fn tag_name(sel: &Selection) -> Option<String> {
    sel.nodes()
        .first()
        .and_then(dom_query::NodeRef::node_name)
        .map(|t| t.to_lowercase())
}

/// Get all attributes as key-value pairs.
///
/// Returns an empty vector if the node has no attributes or the
/// selection is empty.
#[must_use]
pub fn get_all_attributes(sel: &Selection) -> Vec<(String, String)> {
    sel.nodes()
        .first()
        .map(|node| {
            node.attrs()
                .iter()
                .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
                .collect()
        })
        .unwrap_or_default()
}

/// Serialize the element and its whole subtree to HTML.
#[inline]
#[must_use]
pub fn outer_html(sel: &Selection) -> String {
    sel.html().to_string()
}

/// Get the concatenated text content of a selection.
#[inline]
#[must_use]
pub fn text_content(sel: &Selection) -> String {
    sel.text().to_string()
}
