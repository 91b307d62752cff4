//! Candidate validation and record construction.
//!
//! Takes a raw (URL, element, source) candidate and either produces a
//! finalized [`ExtractedImage`] or rejects it: URL screening and
//! normalization, format classification, dimension resolution through
//! source-dependent fallback chains, the minimum-size filter, alt text,
//! and the viewport-visibility flag. A failure anywhere rejects that
//! one candidate and nothing else.

use dom_query::Selection;
use tracing::debug;
use url::Url;

use crate::dom;
use crate::layout::{LayoutProvider, Rect};
use crate::record::{ExtractedImage, ImageSource};
use crate::settings::ExtractionSettings;
use crate::url_utils::{image_format, is_valid_image_url, resolve_candidate_url};

use super::rules::Candidate;

/// Pre-normalization validity screen.
///
/// Data-URI length filtering applies to every source; the URL-shape
/// regex applies only to untrusted sources (data attributes, CSS
/// values). Protocol-relative URLs are given a scheme before the shape
/// check so they are not rejected for their leading `//`.
pub(crate) fn screen(candidate: &Candidate, settings: &ExtractionSettings) -> bool {
    let url = candidate.url.trim();

    if url.len() < 4 {
        return false;
    }

    if url.starts_with("data:")
        && settings.skip_small_data_urls
        && url.len() < settings.min_data_url_length
    {
        debug!(len = url.len(), "data URI below minimum length");
        return false;
    }

    if candidate.trusted {
        return true;
    }

    if let Some(rest) = url.strip_prefix("//") {
        return is_valid_image_url(&format!("https://{rest}"));
    }
    is_valid_image_url(url)
}

/// Build the final record for a screened candidate, or reject it.
pub(crate) fn build_image(
    candidate: &Candidate,
    element: &Selection<'_>,
    tag: &str,
    base: Option<&Url>,
    settings: &ExtractionSettings,
    layout: &dyn LayoutProvider,
) -> Option<ExtractedImage> {
    let url = resolve_candidate_url(&candidate.url, base);
    if url.is_empty() {
        return None;
    }

    let format = image_format(&url);
    if !settings.is_allowed_format(&format) {
        debug!(%format, "format not in allowlist");
        return None;
    }

    let (width, height) = resolve_dimensions(element, tag, candidate.source, layout);

    if width.is_some_and(|w| w < settings.min_width) {
        debug!(?width, min = settings.min_width, "below minimum width");
        return None;
    }
    if height.is_some_and(|h| h < settings.min_height) {
        debug!(?height, min = settings.min_height, "below minimum height");
        return None;
    }

    let alt = if settings.include_alt_text {
        alt_text(element)
    } else {
        None
    };

    Some(ExtractedImage {
        url,
        width,
        height,
        alt,
        format,
        source: candidate.source,
        visible: is_visible_in_viewport(element, layout),
    })
}

/// Alt text, falling back to the `title` attribute.
fn alt_text(element: &Selection<'_>) -> Option<String> {
    dom::get_attribute(element, "alt")
        .filter(|s| !s.trim().is_empty())
        .or_else(|| dom::get_attribute(element, "title").filter(|s| !s.trim().is_empty()))
}

/// Resolve effective dimensions through the source-dependent fallback
/// chain. Each tier is used only if the prior tier yields no positive
/// value; results are rounded to whole pixels.
fn resolve_dimensions(
    element: &Selection<'_>,
    tag: &str,
    source: ImageSource,
    layout: &dyn LayoutProvider,
) -> (Option<u32>, Option<u32>) {
    match source {
        ImageSource::Img | ImageSource::Srcset => image_chain(element, tag == "img", layout),
        ImageSource::VideoPoster => video_chain(element, layout),
        // Lazy-load attributes follow their owning element's nature
        ImageSource::DataAttribute if tag == "img" => image_chain(element, true, layout),
        ImageSource::DataAttribute
        | ImageSource::Background
        | ImageSource::Svg
        | ImageSource::Canvas => style_chain(element, layout),
    }
}

/// width/height attributes -> natural bitmap size (true `img` elements
/// only; the browser may have loaded a different asset from a `picture`
/// sibling, so explicit attributes win over natural size) -> computed
/// CSS -> bounding box.
fn image_chain(
    element: &Selection<'_>,
    is_img: bool,
    layout: &dyn LayoutProvider,
) -> (Option<u32>, Option<u32>) {
    let rect = layout.bounding_box(element);
    let natural = if is_img { layout.natural_size(element) } else { None };

    let width = attr_dimension(element, "width")
        .or_else(|| natural.map(|(w, _)| w).filter(|w| *w > 0))
        .or_else(|| computed_px(element, "width", layout))
        .or_else(|| rect_dimension(rect, rect_width));
    let height = attr_dimension(element, "height")
        .or_else(|| natural.map(|(_, h)| h).filter(|h| *h > 0))
        .or_else(|| computed_px(element, "height", layout))
        .or_else(|| rect_dimension(rect, rect_height));

    (width, height)
}

/// Intrinsic video size -> width/height attributes -> bounding box.
fn video_chain(
    element: &Selection<'_>,
    layout: &dyn LayoutProvider,
) -> (Option<u32>, Option<u32>) {
    let rect = layout.bounding_box(element);
    let intrinsic = layout.video_size(element);

    let width = intrinsic
        .map(|(w, _)| w)
        .filter(|w| *w > 0)
        .or_else(|| attr_dimension(element, "width"))
        .or_else(|| rect_dimension(rect, rect_width));
    let height = intrinsic
        .map(|(_, h)| h)
        .filter(|h| *h > 0)
        .or_else(|| attr_dimension(element, "height"))
        .or_else(|| rect_dimension(rect, rect_height));

    (width, height)
}

/// Computed CSS -> bounding box.
fn style_chain(
    element: &Selection<'_>,
    layout: &dyn LayoutProvider,
) -> (Option<u32>, Option<u32>) {
    let rect = layout.bounding_box(element);

    let width = computed_px(element, "width", layout)
        .or_else(|| rect_dimension(rect, rect_width));
    let height = computed_px(element, "height", layout)
        .or_else(|| rect_dimension(rect, rect_height));

    (width, height)
}

/// Parse an HTML dimension attribute. Takes the leading digits, so
/// `"50"`, `"50px"` and `"50%"` all read as 50; zero and junk read as
/// absent.
fn attr_dimension(element: &Selection<'_>, name: &str) -> Option<u32> {
    let value = dom::get_attribute(element, name)?;
    let digits: String = value.trim().chars().take_while(char::is_ascii_digit).collect();
    digits.parse::<u32>().ok().filter(|v| *v > 0)
}

/// Parse a computed CSS length, ignoring `auto` and `0px`.
fn computed_px(
    element: &Selection<'_>,
    property: &str,
    layout: &dyn LayoutProvider,
) -> Option<u32> {
    let value = layout.computed_style(element, property)?;
    parse_css_length(&value)
}

fn parse_css_length(value: &str) -> Option<u32> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("auto") {
        return None;
    }
    let number = value.strip_suffix("px").unwrap_or(value).trim();
    let parsed: f64 = number.parse().ok()?;
    if parsed > 0.0 {
        Some(parsed.round() as u32)
    } else {
        None
    }
}

fn rect_dimension(rect: Option<Rect>, axis: fn(&Rect) -> f64) -> Option<u32> {
    let rect = rect?;
    let value = axis(&rect);
    if value > 0.0 {
        Some(value.round() as u32)
    } else {
        None
    }
}

fn rect_width(rect: &Rect) -> f64 {
    rect.width
}

fn rect_height(rect: &Rect) -> f64 {
    rect.height
}

/// An element is visible if its rendered box has positive area AND
/// either intersects the current viewport or sits within 1.5x the
/// viewport height from the top of the page ("above the fold" - catches
/// lazy-loaded content about to scroll in).
pub(crate) fn is_visible_in_viewport(
    element: &Selection<'_>,
    layout: &dyn LayoutProvider,
) -> bool {
    let Some(rect) = layout.bounding_box(element) else {
        return false;
    };
    if rect.width <= 0.0 || rect.height <= 0.0 {
        return false;
    }

    let viewport = layout.viewport();
    let currently_visible = rect.top() < viewport.height
        && rect.bottom() > 0.0
        && rect.left() < viewport.width
        && rect.right() > 0.0;

    let page_top = rect.top() + viewport.scroll_y;
    let above_the_fold = page_top < viewport.height * 1.5;

    currently_visible || above_the_fold
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{FixtureLayout, StaticLayout, Viewport};
    use dom_query::Document;

    fn img_candidate(url: &str) -> Candidate {
        Candidate {
            url: url.to_string(),
            source: ImageSource::Img,
            trusted: true,
        }
    }

    fn untrusted(url: &str, source: ImageSource) -> Candidate {
        Candidate {
            url: url.to_string(),
            source,
            trusted: false,
        }
    }

    fn base() -> Url {
        match Url::parse("https://example.com/page/") {
            Ok(u) => u,
            Err(e) => panic!("base url: {e}"),
        }
    }

    #[test]
    fn screen_rejects_short_strings() {
        let settings = ExtractionSettings::default();
        assert!(!screen(&img_candidate(""), &settings));
        assert!(!screen(&img_candidate("/a"), &settings));
    }

    #[test]
    fn screen_trusts_intrinsic_sources() {
        let settings = ExtractionSettings::default();
        // Bare relative path fails the shape regex but is trusted
        assert!(screen(&img_candidate("images/photo.jpg"), &settings));
        assert!(!screen(
            &untrusted("images/photo.jpg", ImageSource::DataAttribute),
            &settings
        ));
    }

    #[test]
    fn screen_accepts_protocol_relative_untrusted() {
        let settings = ExtractionSettings::default();
        assert!(screen(
            &untrusted("//cdn.example.com/x.png", ImageSource::DataAttribute),
            &settings
        ));
    }

    #[test]
    fn screen_data_uri_length_applies_to_all_sources() {
        let settings = ExtractionSettings::default();
        assert!(!screen(&img_candidate("data:image/gif;base64,R0"), &settings));

        let long = format!("data:image/png;base64,{}", "A".repeat(100));
        assert!(screen(&img_candidate(&long), &settings));

        let permissive = ExtractionSettings {
            skip_small_data_urls: false,
            ..ExtractionSettings::default()
        };
        assert!(screen(&img_candidate("data:image/gif;base64,R0"), &permissive));
    }

    #[test]
    fn build_resolves_relative_url() {
        let doc = Document::from(r#"<img src="a.jpg" width="100" height="100">"#);
        let element = doc.select("img");
        let image = build_image(
            &img_candidate("a.jpg"),
            &element,
            "img",
            Some(&base()),
            &ExtractionSettings::default(),
            &StaticLayout,
        );
        match image {
            Some(image) => assert_eq!(image.url, "https://example.com/page/a.jpg"),
            None => panic!("expected an accepted record"),
        }
    }

    #[test]
    fn attributes_win_over_natural_size() {
        let doc = Document::from(r#"<img id="i" src="a.jpg" width="50" height="50">"#);
        let element = doc.select("#i");
        let layout = FixtureLayout::new().with_natural_size("i", 800, 600);
        let (width, height) = resolve_dimensions(&element, "img", ImageSource::Img, &layout);
        assert_eq!(width, Some(50));
        assert_eq!(height, Some(50));
    }

    #[test]
    fn natural_size_used_when_no_attributes() {
        let doc = Document::from(r#"<img id="i" src="a.jpg">"#);
        let element = doc.select("#i");
        let layout = FixtureLayout::new().with_natural_size("i", 800, 600);
        let (width, height) = resolve_dimensions(&element, "img", ImageSource::Img, &layout);
        assert_eq!(width, Some(800));
        assert_eq!(height, Some(600));
    }

    #[test]
    fn computed_style_then_rect_fallback() {
        let doc = Document::from(r#"<img id="i" src="a.jpg">"#);
        let element = doc.select("#i");

        let layout = FixtureLayout::new()
            .with_style("i", "width", "240.4px")
            .with_rect("i", Rect::new(0.0, 0.0, 111.0, 222.0));
        let (width, height) = resolve_dimensions(&element, "img", ImageSource::Img, &layout);
        // width from computed style (rounded), height falls through to the box
        assert_eq!(width, Some(240));
        assert_eq!(height, Some(222));
    }

    #[test]
    fn auto_and_zero_computed_values_ignored() {
        assert_eq!(parse_css_length("auto"), None);
        assert_eq!(parse_css_length("0px"), None);
        assert_eq!(parse_css_length("0"), None);
        assert_eq!(parse_css_length(""), None);
        assert_eq!(parse_css_length("44px"), Some(44));
        assert_eq!(parse_css_length("44.6px"), Some(45));
    }

    #[test]
    fn video_poster_prefers_intrinsic_size() {
        let doc = Document::from(r#"<video id="v" poster="p.jpg" width="300"></video>"#);
        let element = doc.select("#v");
        let layout = FixtureLayout::new().with_video_size("v", 1920, 1080);
        let (width, height) =
            resolve_dimensions(&element, "video", ImageSource::VideoPoster, &layout);
        assert_eq!(width, Some(1920));
        assert_eq!(height, Some(1080));
    }

    #[test]
    fn video_poster_attribute_fallback() {
        let doc = Document::from(r#"<video id="v" poster="p.jpg" width="300" height="150"></video>"#);
        let element = doc.select("#v");
        let (width, height) = resolve_dimensions(
            &element,
            "video",
            ImageSource::VideoPoster,
            &StaticLayout,
        );
        assert_eq!(width, Some(300));
        assert_eq!(height, Some(150));
    }

    #[test]
    fn background_uses_style_chain_not_attributes() {
        let doc = Document::from(r#"<div id="d" width="9999"></div>"#);
        let element = doc.select("#d");
        let layout = FixtureLayout::new().with_rect("d", Rect::new(0.0, 0.0, 120.0, 80.0));
        let (width, height) =
            resolve_dimensions(&element, "div", ImageSource::Background, &layout);
        assert_eq!(width, Some(120));
        assert_eq!(height, Some(80));
    }

    #[test]
    fn minimum_size_filter_rejects_resolved_small() {
        let doc = Document::from(r#"<img src="a.jpg" width="10" height="10">"#);
        let element = doc.select("img");
        let image = build_image(
            &img_candidate("a.jpg"),
            &element,
            "img",
            Some(&base()),
            &ExtractionSettings::default(),
            &StaticLayout,
        );
        assert!(image.is_none());
    }

    #[test]
    fn unresolved_dimensions_never_reject() {
        let doc = Document::from(r#"<img src="a.jpg">"#);
        let element = doc.select("img");
        let image = build_image(
            &img_candidate("a.jpg"),
            &element,
            "img",
            Some(&base()),
            &ExtractionSettings::default(),
            &StaticLayout,
        );
        match image {
            Some(image) => {
                assert_eq!(image.width, None);
                assert_eq!(image.height, None);
            }
            None => panic!("dimensionless record must be accepted"),
        }
    }

    #[test]
    fn alt_text_prefers_alt_then_title() {
        let doc = Document::from(
            r#"<img id="a" src="x.jpg" alt="the alt" title="the title">
               <img id="b" src="y.jpg" title="only title">
               <img id="c" src="z.jpg">"#,
        );
        assert_eq!(alt_text(&doc.select("#a")).as_deref(), Some("the alt"));
        assert_eq!(alt_text(&doc.select("#b")).as_deref(), Some("only title"));
        assert_eq!(alt_text(&doc.select("#c")), None);
    }

    #[test]
    fn alt_text_disabled_by_settings() {
        let doc = Document::from(r#"<img src="x.jpg" alt="hello" width="100" height="100">"#);
        let element = doc.select("img");
        let settings = ExtractionSettings {
            include_alt_text: false,
            ..ExtractionSettings::default()
        };
        let image = build_image(
            &img_candidate("x.jpg"),
            &element,
            "img",
            Some(&base()),
            &settings,
            &StaticLayout,
        );
        match image {
            Some(image) => assert_eq!(image.alt, None),
            None => panic!("expected an accepted record"),
        }
    }

    #[test]
    fn format_allowlist_rejects() {
        let doc = Document::from(r#"<img src="x.gif" width="100" height="100">"#);
        let element = doc.select("img");
        let settings = ExtractionSettings {
            allowed_formats: Some(vec!["jpg".to_string(), "png".to_string()]),
            ..ExtractionSettings::default()
        };
        let image = build_image(
            &img_candidate("x.gif"),
            &element,
            "img",
            Some(&base()),
            &settings,
            &StaticLayout,
        );
        assert!(image.is_none());
    }

    #[test]
    fn visibility_inside_viewport() {
        let doc = Document::from(r#"<img id="i" src="a.jpg">"#);
        let element = doc.select("#i");
        let layout = FixtureLayout::new()
            .with_viewport(Viewport { width: 1000.0, height: 800.0, scroll_x: 0.0, scroll_y: 0.0 })
            .with_rect("i", Rect::new(100.0, 100.0, 300.0, 200.0));
        assert!(is_visible_in_viewport(&element, &layout));
    }

    #[test]
    fn visibility_far_below_fold() {
        let doc = Document::from(r#"<img id="i" src="a.jpg">"#);
        let element = doc.select("#i");
        let layout = FixtureLayout::new()
            .with_viewport(Viewport { width: 1000.0, height: 800.0, scroll_x: 0.0, scroll_y: 0.0 })
            .with_rect("i", Rect::new(0.0, 5000.0, 300.0, 200.0));
        assert!(!is_visible_in_viewport(&element, &layout));
    }

    #[test]
    fn visibility_within_fold_allowance() {
        let doc = Document::from(r#"<img id="i" src="a.jpg">"#);
        let element = doc.select("#i");
        // Just below the viewport but under 1.5x its height from the top
        let layout = FixtureLayout::new()
            .with_viewport(Viewport { width: 1000.0, height: 800.0, scroll_x: 0.0, scroll_y: 0.0 })
            .with_rect("i", Rect::new(0.0, 1000.0, 300.0, 200.0));
        assert!(is_visible_in_viewport(&element, &layout));
    }

    #[test]
    fn visibility_requires_positive_box() {
        let doc = Document::from(r#"<img id="i" src="a.jpg">"#);
        let element = doc.select("#i");
        let layout = FixtureLayout::new().with_rect("i", Rect::new(0.0, 0.0, 0.0, 200.0));
        assert!(!is_visible_in_viewport(&element, &layout));
    }
}
