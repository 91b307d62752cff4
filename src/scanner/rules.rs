//! Per-element extraction rules.
//!
//! Each rule is one heuristic for discovering image candidates on an
//! element. Rules are independent and not mutually exclusive: every
//! enabled rule whose shape matches is applied, so a single element can
//! yield candidates from several rules. The rule set is closed; the
//! scanner iterates [`ExtractionRule::ALL`] per element.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use dom_query::Selection;
use tracing::warn;

use crate::css::extract_css_url;
use crate::dom;
use crate::layout::{LayoutProvider, PseudoElement};
use crate::record::ImageSource;
use crate::settings::ExtractionSettings;
use crate::srcset::parse_srcset;

/// A discovered (URL, source) pair, not yet validated.
///
/// `trusted` marks element-intrinsic attributes (`src`, `srcset`,
/// `poster`) and self-produced data URIs, which skip the URL-shape
/// screen; data-attribute and CSS-derived strings are screened.
#[derive(Debug, Clone)]
pub(crate) struct Candidate {
    pub url: String,
    pub source: ImageSource,
    pub trusted: bool,
}

impl Candidate {
    fn trusted(url: String, source: ImageSource) -> Self {
        Self { url, source, trusted: true }
    }

    fn untrusted(url: String, source: ImageSource) -> Self {
        Self { url, source, trusted: false }
    }
}

/// The closed set of extraction heuristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExtractionRule {
    /// `input[type=image]` submit buttons.
    ImageButton,
    /// `img` elements: `src` plus every `srcset` entry.
    ImageTag,
    /// `source` elements inside `picture` / `video`: `srcset` entries.
    SourceTag,
    /// CSS backgrounds: inline style, computed style, and
    /// `::before` / `::after` pseudo-element content.
    Background,
    /// `video` element `poster` attributes.
    VideoPoster,
    /// Inline `<svg>` roots, serialized to a data URI.
    InlineSvg,
    /// `canvas` pixel read-back (opt-in).
    Canvas,
    /// Lazy-load `data-*` attributes on any element.
    DataAttribute,
}

impl ExtractionRule {
    pub(crate) const ALL: [Self; 8] = [
        Self::ImageButton,
        Self::ImageTag,
        Self::SourceTag,
        Self::Background,
        Self::VideoPoster,
        Self::InlineSvg,
        Self::Canvas,
        Self::DataAttribute,
    ];

    fn enabled(self, settings: &ExtractionSettings) -> bool {
        match self {
            Self::ImageButton | Self::ImageTag | Self::SourceTag => settings.include_img_tags,
            Self::Background => settings.include_backgrounds,
            Self::VideoPoster => settings.include_video_posters,
            Self::InlineSvg => settings.include_svg,
            Self::Canvas => settings.include_canvas,
            Self::DataAttribute => settings.include_data_attributes,
        }
    }

    fn matches(self, tag: &str, element: &Selection<'_>) -> bool {
        match self {
            Self::ImageButton => {
                tag == "input"
                    && dom::get_attribute(element, "type")
                        .is_some_and(|t| t.eq_ignore_ascii_case("image"))
            }
            Self::ImageTag => tag == "img",
            Self::SourceTag => tag == "source",
            Self::VideoPoster => tag == "video",
            Self::InlineSvg => tag == "svg",
            Self::Canvas => tag == "canvas",
            Self::Background | Self::DataAttribute => true,
        }
    }

    fn collect(
        self,
        element: &Selection<'_>,
        settings: &ExtractionSettings,
        layout: &dyn LayoutProvider,
        out: &mut Vec<Candidate>,
    ) {
        match self {
            Self::ImageButton => {
                if let Some(src) = dom::get_attribute(element, "src") {
                    out.push(Candidate::trusted(src, ImageSource::Img));
                }
            }
            Self::ImageTag => {
                if let Some(src) = dom::get_attribute(element, "src") {
                    out.push(Candidate::trusted(src, ImageSource::Img));
                }
                if let Some(srcset) = dom::get_attribute(element, "srcset") {
                    for url in parse_srcset(&srcset) {
                        out.push(Candidate::trusted(url, ImageSource::Srcset));
                    }
                }
            }
            Self::SourceTag => {
                if let Some(srcset) = dom::get_attribute(element, "srcset") {
                    for url in parse_srcset(&srcset) {
                        out.push(Candidate::trusted(url, ImageSource::Srcset));
                    }
                }
            }
            Self::Background => collect_backgrounds(element, layout, out),
            Self::VideoPoster => {
                if let Some(poster) = dom::get_attribute(element, "poster") {
                    out.push(Candidate::trusted(poster, ImageSource::VideoPoster));
                }
            }
            Self::InlineSvg => {
                let markup = dom::outer_html(element);
                if !markup.is_empty() {
                    let data_url =
                        format!("data:image/svg+xml;base64,{}", BASE64.encode(markup));
                    out.push(Candidate::trusted(data_url, ImageSource::Svg));
                }
            }
            Self::Canvas => match layout.canvas_data_url(element) {
                Ok(Some(data_url)) => {
                    out.push(Candidate::trusted(data_url, ImageSource::Canvas));
                }
                Ok(None) => {}
                // Cross-origin content taints the canvas; never fatal
                Err(err) => warn!(error = %err, "could not extract canvas"),
            },
            Self::DataAttribute => collect_data_attributes(element, settings, out),
        }
    }
}

/// Run every enabled, matching rule against one element.
pub(crate) fn element_candidates(
    element: &Selection<'_>,
    tag: &str,
    settings: &ExtractionSettings,
    layout: &dyn LayoutProvider,
) -> Vec<Candidate> {
    let mut out = Vec::new();
    for rule in ExtractionRule::ALL {
        if rule.enabled(settings) && rule.matches(tag, element) {
            rule.collect(element, settings, layout, &mut out);
        }
    }
    out
}

/// Inline style takes priority over the computed style; the pseudo
/// elements are checked on top of either.
fn collect_backgrounds(
    element: &Selection<'_>,
    layout: &dyn LayoutProvider,
    out: &mut Vec<Candidate>,
) {
    let inline = dom::get_attribute(element, "style")
        .and_then(|style| inline_style_value(&style, "background-image"))
        .and_then(|value| extract_css_url(&value));

    let background = inline.or_else(|| {
        layout
            .computed_style(element, "background-image")
            .and_then(|value| extract_css_url(&value))
    });

    if let Some(url) = background {
        out.push(Candidate::untrusted(url, ImageSource::Background));
    }

    for pseudo in [PseudoElement::Before, PseudoElement::After] {
        if let Some(url) = layout
            .pseudo_content(element, pseudo)
            .and_then(|content| extract_css_url(&content))
        {
            out.push(Candidate::untrusted(url, ImageSource::Background));
        }
    }
}

fn collect_data_attributes(
    element: &Selection<'_>,
    settings: &ExtractionSettings,
    out: &mut Vec<Candidate>,
) {
    for (name, value) in dom::get_all_attributes(element) {
        let Some(data_name) = name.strip_prefix("data-") else {
            continue;
        };
        if value.is_empty() || !settings.is_image_data_attribute(data_name) {
            continue;
        }
        out.push(Candidate::untrusted(value, ImageSource::DataAttribute));
    }
}

/// Look up a property in an inline `style` attribute string.
fn inline_style_value(style: &str, property: &str) -> Option<String> {
    for declaration in style.split(';') {
        let Some((name, value)) = declaration.split_once(':') else {
            continue;
        };
        if name.trim().eq_ignore_ascii_case(property) {
            let value = value.trim();
            if value.is_empty() {
                return None;
            }
            return Some(value.to_string());
        }
    }
    None
}
