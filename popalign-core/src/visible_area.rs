//! Visible region computation
//!
//! Starts from the viewport (or the whole scrollable document) and folds in
//! every clipping ancestor's inner box.

use popalign_common::{non_nan, Region};
use tracing::trace;

use crate::dom::{DocumentMetrics, ElementKind, LayoutHost, OverflowStyle};

/// Round to three decimals, the precision scale factors are compared at
pub(crate) fn round_scale(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Rendered size over layout size. NaN (0/0) and infinities fall back to 1.
pub(crate) fn scale_factor(rendered: f64, layout: f64) -> f64 {
    let scale = round_scale(rendered / layout);
    if scale.is_finite() {
        scale
    } else {
        1.0
    }
}

/// `(viewport, whole document)` regions in client coordinates
pub fn base_regions(metrics: &DocumentMetrics) -> (Region, Region) {
    let visible = Region::new(0.0, 0.0, metrics.client_width, metrics.client_height);
    let scroll = Region::new(
        -metrics.scroll_left,
        -metrics.scroll_top,
        metrics.scroll_width - metrics.scroll_left,
        metrics.scroll_height - metrics.scroll_top,
    );
    (visible, scroll)
}

/// The inner clipping box of one scroller, in client coordinates.
///
/// Borders and scrollbars are cut off, `overflow: clip` grows the box by its
/// clip margin, and all of it is scaled by any transform on the scroller.
pub fn clip_box<H: LayoutHost>(host: &H, element: &H::Element) -> Region {
    let computed = host.computed_box(element);
    let rect = host.bounding_rect(element);
    let outer = host.offset_size(element);
    let inner = host.client_size(element);

    let border = computed.border;
    let (border_top, border_right, border_bottom, border_left) = (
        non_nan(border.top, 0.0),
        non_nan(border.right, 0.0),
        non_nan(border.bottom, 0.0),
        non_nan(border.left, 0.0),
    );

    let scale_x = scale_factor(rect.width, outer.width);
    let scale_y = scale_factor(rect.height, outer.height);

    // Scrollbar thickness is whatever the outer box has beyond inner + borders
    let scrollbar_width = (outer.width - inner.width - border_left - border_right) * scale_x;
    let scrollbar_height = (outer.height - inner.height - border_top - border_bottom) * scale_y;

    let scaled_top = border_top * scale_y;
    let scaled_bottom = border_bottom * scale_y;
    let scaled_left = border_left * scale_x;
    let scaled_right = border_right * scale_x;

    let (clip_width, clip_height) = if computed.overflow == OverflowStyle::Clip {
        let margin = non_nan(computed.overflow_clip_margin, 0.0);
        (margin * scale_x, margin * scale_y)
    } else {
        (0.0, 0.0)
    };

    let left = rect.x + scaled_left - clip_width;
    let top = rect.y + scaled_top - clip_height;
    let right = left + rect.width + 2.0 * clip_width - scaled_left - scaled_right - scrollbar_width;
    let bottom =
        top + rect.height + 2.0 * clip_height - scaled_top - scaled_bottom - scrollbar_height;

    Region::new(left, top, right, bottom)
}

/// Shrink `base` by every scroller's clip box.
///
/// `<html>` and `<body>` are skipped: the choice of base region already
/// accounts for them. Each fold can only shrink the region.
pub fn compute_visible_area<H: LayoutHost>(
    host: &H,
    base: Region,
    scrollers: &[H::Element],
) -> Region {
    scrollers.iter().fold(base, |area, scroller| {
        if host.element_kind(scroller) != ElementKind::Other {
            return area;
        }
        let clip = clip_box(host, scroller);
        trace!("Folding scroller {scroller:?} clip box {clip:?} into {area:?}");
        area.clipped_by(&clip)
    })
}
