//! Layout and computed-style abstraction.
//!
//! The extraction algorithm depends on live layout measurement (bounding
//! boxes, computed styles, intrinsic bitmap sizes) that only a renderer
//! can supply. That capability is injected through [`LayoutProvider`] so
//! the algorithm runs unchanged against a real layout source, against
//! nothing at all ([`StaticLayout`]), or against a synthetic fixture in
//! tests ([`FixtureLayout`]).

use std::collections::HashMap;
use std::time::Duration;

use dom_query::Selection;

/// A rendered bounding box in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    #[must_use]
    pub fn top(&self) -> f64 {
        self.y
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn left(&self) -> f64 {
        self.x
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }
}

/// The viewport rectangle and scroll position at scan time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub scroll_x: f64,
    pub scroll_y: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
            scroll_x: 0.0,
            scroll_y: 0.0,
        }
    }
}

/// The two CSS pseudo-elements whose `content` can carry an image URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PseudoElement {
    Before,
    After,
}

/// Canvas read-back failure, typically cross-origin taint.
#[derive(Debug, Clone, thiserror::Error)]
#[error("canvas read-back failed: {0}")]
pub struct CanvasError(pub String);

/// Injected source of layout and computed-style information.
///
/// Every method is element-scoped; implementations decide how to
/// identify elements (a real renderer by node handle, the test fixture
/// by `id` attribute). Returning `None` means "no information", which
/// the extraction pipeline treats as a missing tier in its fallback
/// chains, never as an error.
pub trait LayoutProvider {
    /// Viewport dimensions and scroll position.
    fn viewport(&self) -> Viewport;

    /// Rendered bounding box of the element, if it has one.
    fn bounding_box(&self, element: &Selection<'_>) -> Option<Rect>;

    /// Computed value of a CSS property (`"width"`, `"background-image"`, ...).
    fn computed_style(&self, element: &Selection<'_>, property: &str) -> Option<String>;

    /// Computed `content` value of a `::before` / `::after` pseudo-element.
    fn pseudo_content(&self, element: &Selection<'_>, pseudo: PseudoElement) -> Option<String>;

    /// Intrinsic bitmap dimensions of a loaded `img` element.
    fn natural_size(&self, element: &Selection<'_>) -> Option<(u32, u32)>;

    /// Intrinsic dimensions of a `video` element's media.
    fn video_size(&self, element: &Selection<'_>) -> Option<(u32, u32)>;

    /// Serialize a `canvas` element's pixel buffer to a data URI.
    ///
    /// `Ok(None)` means the provider has no pixel data for the element;
    /// `Err` signals a read-back failure such as cross-origin taint.
    fn canvas_data_url(&self, element: &Selection<'_>) -> Result<Option<String>, CanvasError>;
}

/// Renderless provider: no boxes, no computed styles, default viewport.
///
/// With this provider only attribute-derived information is available,
/// and every visibility flag evaluates to `false`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticLayout;

impl LayoutProvider for StaticLayout {
    fn viewport(&self) -> Viewport {
        Viewport::default()
    }

    fn bounding_box(&self, _element: &Selection<'_>) -> Option<Rect> {
        None
    }

    fn computed_style(&self, _element: &Selection<'_>, _property: &str) -> Option<String> {
        None
    }

    fn pseudo_content(&self, _element: &Selection<'_>, _pseudo: PseudoElement) -> Option<String> {
        None
    }

    fn natural_size(&self, _element: &Selection<'_>) -> Option<(u32, u32)> {
        None
    }

    fn video_size(&self, _element: &Selection<'_>) -> Option<(u32, u32)> {
        None
    }

    fn canvas_data_url(&self, _element: &Selection<'_>) -> Result<Option<String>, CanvasError> {
        Ok(None)
    }
}

/// Synthetic layout fixture keyed by element `id` attribute.
///
/// Built with the `with_*` methods; elements without an `id`, or with an
/// `id` the fixture doesn't know, get no layout information. The
/// optional per-element delay slows every lookup down, which lets tests
/// drive the scan past its deadline.
#[derive(Debug, Clone, Default)]
pub struct FixtureLayout {
    viewport: Viewport,
    rects: HashMap<String, Rect>,
    styles: HashMap<(String, String), String>,
    pseudo: HashMap<(String, PseudoElement), String>,
    natural: HashMap<String, (u32, u32)>,
    video: HashMap<String, (u32, u32)>,
    canvas: HashMap<String, Result<String, String>>,
    element_delay: Option<Duration>,
}

impl FixtureLayout {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    #[must_use]
    pub fn with_rect(mut self, id: &str, rect: Rect) -> Self {
        self.rects.insert(id.to_string(), rect);
        self
    }

    #[must_use]
    pub fn with_style(mut self, id: &str, property: &str, value: &str) -> Self {
        self.styles
            .insert((id.to_string(), property.to_string()), value.to_string());
        self
    }

    #[must_use]
    pub fn with_pseudo_content(mut self, id: &str, pseudo: PseudoElement, value: &str) -> Self {
        self.pseudo
            .insert((id.to_string(), pseudo), value.to_string());
        self
    }

    #[must_use]
    pub fn with_natural_size(mut self, id: &str, width: u32, height: u32) -> Self {
        self.natural.insert(id.to_string(), (width, height));
        self
    }

    #[must_use]
    pub fn with_video_size(mut self, id: &str, width: u32, height: u32) -> Self {
        self.video.insert(id.to_string(), (width, height));
        self
    }

    #[must_use]
    pub fn with_canvas(mut self, id: &str, data_url: &str) -> Self {
        self.canvas.insert(id.to_string(), Ok(data_url.to_string()));
        self
    }

    /// Make canvas read-back fail for this element, simulating
    /// cross-origin taint.
    #[must_use]
    pub fn with_tainted_canvas(mut self, id: &str) -> Self {
        self.canvas
            .insert(id.to_string(), Err("tainted by cross-origin data".to_string()));
        self
    }

    /// Sleep this long on every layout lookup. Used to simulate slow
    /// traversal in timeout tests.
    #[must_use]
    pub fn with_element_delay(mut self, delay: Duration) -> Self {
        self.element_delay = Some(delay);
        self
    }

    fn key(element: &Selection<'_>) -> Option<String> {
        element.attr("id").map(|s| s.to_string())
    }

    fn tick(&self) {
        if let Some(delay) = self.element_delay {
            std::thread::sleep(delay);
        }
    }
}

impl LayoutProvider for FixtureLayout {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn bounding_box(&self, element: &Selection<'_>) -> Option<Rect> {
        self.tick();
        self.rects.get(&Self::key(element)?).copied()
    }

    fn computed_style(&self, element: &Selection<'_>, property: &str) -> Option<String> {
        self.tick();
        let id = Self::key(element)?;
        self.styles.get(&(id, property.to_string())).cloned()
    }

    fn pseudo_content(&self, element: &Selection<'_>, pseudo: PseudoElement) -> Option<String> {
        let id = Self::key(element)?;
        self.pseudo.get(&(id, pseudo)).cloned()
    }

    fn natural_size(&self, element: &Selection<'_>) -> Option<(u32, u32)> {
        self.natural.get(&Self::key(element)?).copied()
    }

    fn video_size(&self, element: &Selection<'_>) -> Option<(u32, u32)> {
        self.video.get(&Self::key(element)?).copied()
    }

    fn canvas_data_url(&self, element: &Selection<'_>) -> Result<Option<String>, CanvasError> {
        let Some(id) = Self::key(element) else {
            return Ok(None);
        };
        match self.canvas.get(&id) {
            Some(Ok(data_url)) => Ok(Some(data_url.clone())),
            Some(Err(reason)) => Err(CanvasError(reason.clone())),
            None => Ok(None),
        }
    }
}
