//! DOM measurement abstraction
//!
//! The engine never talks to a browser directly. Everything it needs to
//! read goes through [`LayoutHost`], so alignment can run against the real
//! DOM (`popalign-web`) or an in-memory fake in tests.

use std::fmt;

use popalign_common::{Rect, Size};

/// Computed `overflow` keyword
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OverflowStyle {
    #[default]
    Visible,
    Hidden,
    Scroll,
    Clip,
    Auto,
}

impl OverflowStyle {
    /// Parse a computed-style keyword. Unknown values behave like `visible`.
    pub fn from_css(value: &str) -> Self {
        match value.trim() {
            "hidden" => Self::Hidden,
            "scroll" => Self::Scroll,
            "clip" => Self::Clip,
            "auto" => Self::Auto,
            _ => Self::Visible,
        }
    }

    /// Whether content past the box edge is cut off
    pub fn clips(&self) -> bool {
        !matches!(self, Self::Visible)
    }
}

/// Border widths in px
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Edges {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

/// The subset of `getComputedStyle` the engine reads
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ComputedBox {
    pub overflow: OverflowStyle,
    pub overflow_x: OverflowStyle,
    pub overflow_y: OverflowStyle,
    /// `overflow-clip-margin` in px, only meaningful with `overflow: clip`
    pub overflow_clip_margin: f64,
    pub border: Edges,
    /// Computed `width`/`height` in px, NaN when not a length
    pub width: f64,
    pub height: f64,
}

impl ComputedBox {
    pub fn clips(&self) -> bool {
        self.overflow.clips() || self.overflow_x.clips() || self.overflow_y.clips()
    }
}

/// `parseFloat` for computed style values: leading number, NaN otherwise.
///
/// `"12.5px"` -> 12.5, `"auto"` -> NaN
pub fn parse_px(value: &str) -> f64 {
    let value = value.trim_start();
    let end = value
        .char_indices()
        .find(|&(i, c)| {
            !(c.is_ascii_digit()
                || c == '.'
                || ((c == '-' || c == '+') && i == 0)
                || ((c == 'e' || c == 'E') && i > 0))
        })
        .map(|(i, _)| i)
        .unwrap_or(value.len());
    // Back off a dangling exponent marker ("1e" is not a number, "1" is)
    let mut candidate = &value[..end];
    while !candidate.is_empty() {
        if let Ok(number) = candidate.parse::<f64>() {
            return number;
        }
        candidate = &candidate[..candidate.len() - 1];
    }
    f64::NAN
}

/// Elements that are handled through the base region instead of as scrollers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Html,
    Body,
    Other,
}

/// Document-level measurements (`document.documentElement`)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DocumentMetrics {
    pub client_width: f64,
    pub client_height: f64,
    pub scroll_width: f64,
    pub scroll_height: f64,
    pub scroll_top: f64,
    pub scroll_left: f64,
}

/// Popup rectangles measured with the popup temporarily pinned to a corner
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PopupMeasurement {
    /// Bounding rect with `left: 0; top: 0`
    pub rect: Rect,
    /// Bounding rect with `right: 0; bottom: 0`
    pub mirror: Rect,
    /// Unscaled computed `width`/`height` (NaN when unavailable)
    pub style_size: Size,
}

/// Read-only access to layout information.
///
/// Implementations must never panic on detached or missing elements; return
/// zero sizes and `None` instead, the engine treats those as "not ready".
pub trait LayoutHost {
    type Element: Clone + PartialEq + fmt::Debug;

    fn parent_element(&self, element: &Self::Element) -> Option<Self::Element>;

    fn element_kind(&self, element: &Self::Element) -> ElementKind;

    fn computed_box(&self, element: &Self::Element) -> ComputedBox;

    /// `getBoundingClientRect()`
    fn bounding_rect(&self, element: &Self::Element) -> Rect;

    /// `offsetWidth`/`offsetHeight`: layout size before transforms
    fn offset_size(&self, element: &Self::Element) -> Size;

    /// `clientWidth`/`clientHeight`: inside borders, without scrollbars
    fn client_size(&self, element: &Self::Element) -> Size;

    fn has_offset_parent(&self, element: &Self::Element) -> bool;

    /// `getBBox()` size for SVG elements, `None` for everything else
    fn bbox_size(&self, element: &Self::Element) -> Option<Size>;

    /// Host element of the shadow root containing `element`, `None` when it
    /// lives directly in the document
    fn shadow_host(&self, element: &Self::Element) -> Option<Self::Element>;

    /// `None` outside a browser
    fn document_metrics(&self) -> Option<DocumentMetrics>;

    /// Measure the popup pinned top-left and bottom-right. Any style changes
    /// made to measure must be restored before returning.
    fn measure_popup(&self, popup: &Self::Element) -> PopupMeasurement;
}

/// Whether an element currently takes up space on screen
pub fn is_visible<H: LayoutHost>(host: &H, element: &H::Element) -> bool {
    if host.has_offset_parent(element) {
        return true;
    }
    if host.bbox_size(element).is_some_and(|size| !size.is_empty()) {
        return true;
    }
    let rect = host.bounding_rect(element);
    rect.width > 0.0 && rect.height > 0.0
}
