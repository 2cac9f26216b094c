//! Popup alignment
//!
//! Places a popup rectangle relative to a target so that the two configured
//! anchor points meet, then corrects for collisions with the visible region:
//!
//! 1. **Flip** to the mirrored side on an axis when the popup overflows and
//!    the mirrored position shows more of it.
//! 2. **Shift** along an axis to pull an overflowing popup back inside, but
//!    never so far that the popup loses its target.
//!
//! [`compute_alignment`] is pure geometry. [`align`] gathers its inputs from a
//! [`LayoutHost`].

use popalign_common::{round_half_up, AnchorPoint, Axis, HAnchor, Point, Rect, Region, VAnchor};
use tracing::debug;

use crate::dom::{is_visible, LayoutHost};
use crate::placement::{HtmlRegion, Placement};
use crate::scroller::collect_scrollers;
use crate::visible_area::{base_regions, compute_visible_area, scale_factor};

/// What the popup is aligned against
#[derive(Debug, Clone, PartialEq)]
pub enum AlignTarget<E> {
    Element(E),
    /// A literal client position, e.g. the mouse for context menus
    Point(Point),
}

/// Flips taken on the previous pass, per direction.
///
/// Once a direction has flipped, later passes evaluate the flipped candidate
/// first even if the original position momentarily fits again, so the popup
/// doesn't flicker between sides while scrolling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlipMemory {
    /// bottom -> top
    pub bt: bool,
    /// top -> bottom
    pub tb: bool,
    /// right -> left
    pub rl: bool,
    /// left -> right
    pub lr: bool,
}

impl FlipMemory {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Output of one alignment pass
#[derive(Debug, Clone, PartialEq)]
pub struct AlignResult {
    pub ready: bool,
    /// Offset from the popup's natural left/top position
    pub offset_x: f64,
    pub offset_y: f64,
    /// Same placement expressed as right/bottom insets
    pub offset_r: f64,
    pub offset_b: f64,
    /// Arrow anchor relative to the popup's top-left corner
    pub arrow_x: f64,
    pub arrow_y: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    /// The placement actually used, with flipped points if any
    pub align: Placement,
}

impl AlignResult {
    /// Initial state before the first successful pass
    pub fn pending(align: Placement) -> Self {
        Self {
            ready: false,
            offset_x: 0.0,
            offset_y: 0.0,
            offset_r: 0.0,
            offset_b: 0.0,
            arrow_x: 0.0,
            arrow_y: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            align,
        }
    }
}

/// Everything one alignment pass looks at
#[derive(Debug, Clone)]
pub struct AlignInput<'a> {
    pub target: Rect,
    /// Popup rect while pinned at `left: 0; top: 0`
    pub popup: Rect,
    /// Popup rect while pinned at `right: 0; bottom: 0`
    pub popup_mirror: Rect,
    pub scale_x: f64,
    pub scale_y: f64,
    pub placement: &'a Placement,
    /// Viewport clipped by scrollers
    pub visible_region: Region,
    /// Whole document clipped by scrollers
    pub scroll_region: Region,
}

/// Compute where the popup goes.
///
/// Returns the result and the flip memory to carry into the next pass.
pub fn compute_alignment(input: &AlignInput<'_>, mut flip: FlipMemory) -> (AlignResult, FlipMemory) {
    let placement = input.placement;
    let popup = input.popup;
    let popup_width = popup.width;
    let popup_height = popup.height;

    let visible_first = placement.html_region == HtmlRegion::VisibleFirst;
    let visible_area = match placement.html_region {
        HtmlRegion::Visible => input.visible_region,
        HtmlRegion::Scroll | HtmlRegion::VisibleFirst => input.scroll_region,
    };
    // visibleFirst decides whether to flip by what is on screen
    let adjust_check_area = if visible_first {
        input.visible_region
    } else {
        visible_area
    };

    let (popup_offset_x, popup_offset_y) = placement.offset.resolve(popup.size());
    let (target_offset_x, target_offset_y) = placement.target_offset.resolve(input.target.size());
    let target = input
        .target
        .translated(-target_offset_x, -target_offset_y);

    let points = placement.points;
    let target_anchor = points.target.on(&target);
    let popup_anchor = points.popup.on(&popup);

    let mut next_align = placement.clone();
    let mut offset_x = target_anchor.x - popup_anchor.x + popup_offset_x;
    let mut offset_y = target_anchor.y - popup_anchor.y + popup_offset_y;

    let area = |dx: f64, dy: f64, region: &Region| popup.intersection_area(dx, dy, region);
    let origin_area = area(offset_x, offset_y, &visible_area);
    let origin_recommend_area = area(offset_x, offset_y, &input.visible_region);

    // Exact comparisons on purpose: ties are broken by the viewport area only
    // when the scroll-region areas are bit-identical.
    let prefer = |dx: f64, dy: f64| {
        let candidate = area(dx, dy, &visible_area);
        candidate > origin_area
            || (candidate == origin_area
                && (!visible_first
                    || area(dx, dy, &input.visible_region) >= origin_recommend_area))
    };

    let target_tl = AnchorPoint::TOP_LEFT.on(&target);
    let target_br = AnchorPoint::BOTTOM_RIGHT.on(&target);
    let popup_tl = AnchorPoint::TOP_LEFT.on(&popup);
    let popup_br = AnchorPoint::BOTTOM_RIGHT.on(&popup);

    let popup_top = popup.y + offset_y;
    let popup_bottom = popup_top + popup_height;
    let popup_left = popup.x + offset_x;
    let popup_right = popup_left + popup_width;

    // Top & bottom
    if placement.overflow.flip_y() {
        let same_tb = points.popup.vertical == points.target.vertical;

        if points.popup.vertical == VAnchor::Top
            && (popup_bottom > adjust_check_area.bottom || flip.bt)
        {
            let candidate = if same_tb {
                offset_y - (popup_height - target.height)
            } else {
                target_tl.y - popup_br.y - popup_offset_y
            };
            flip.bt = prefer(offset_x, candidate);
            if flip.bt {
                offset_y = candidate;
                next_align.points = points.reversed(Axis::Vertical);
            }
        }

        if points.popup.vertical == VAnchor::Bottom
            && (popup_top < adjust_check_area.top || flip.tb)
        {
            let candidate = if same_tb {
                offset_y + (popup_height - target.height)
            } else {
                target_br.y - popup_tl.y - popup_offset_y
            };
            flip.tb = prefer(offset_x, candidate);
            if flip.tb {
                offset_y = candidate;
                next_align.points = points.reversed(Axis::Vertical);
            }
        }
    }

    // Left & right
    if placement.overflow.flip_x() {
        let same_lr = points.popup.horizontal == points.target.horizontal;

        if points.popup.horizontal == HAnchor::Left
            && (popup_right > adjust_check_area.right || flip.rl)
        {
            let candidate = if same_lr {
                offset_x - (popup_width - target.width)
            } else {
                target_tl.x - popup_br.x - popup_offset_x
            };
            flip.rl = prefer(candidate, offset_y);
            if flip.rl {
                offset_x = candidate;
                next_align.points = next_align.points.reversed(Axis::Horizontal);
            }
        }

        if points.popup.horizontal == HAnchor::Right
            && (popup_left < adjust_check_area.left || flip.lr)
        {
            let candidate = if same_lr {
                offset_x + (popup_width - target.width)
            } else {
                target_br.x - popup_tl.x - popup_offset_x
            };
            flip.lr = prefer(candidate, offset_y);
            if flip.lr {
                offset_x = candidate;
                next_align.points = next_align.points.reversed(Axis::Horizontal);
            }
        }
    }

    // Shift, against where the popup ended up after flipping
    let shift_region = input.visible_region;
    let popup_top = popup.y + offset_y;
    let popup_bottom = popup_top + popup_height;
    let popup_left = popup.x + offset_x;
    let popup_right = popup_left + popup_width;

    if let Some(allowance) = placement.overflow.shift_x_allowance() {
        if popup_left < shift_region.left {
            offset_x -= popup_left - shift_region.left;
            if target.right() < shift_region.left + allowance {
                offset_x += target.right() - shift_region.left - allowance;
            }
        }
        if popup_right > shift_region.right {
            offset_x -= popup_right - shift_region.right;
            if target.left() > shift_region.right - allowance {
                offset_x += target.left() - shift_region.right + allowance;
            }
        }
    }

    if let Some(allowance) = placement.overflow.shift_y_allowance() {
        if popup_top < shift_region.top {
            offset_y -= popup_top - shift_region.top;
            if target.bottom() < shift_region.top + allowance {
                offset_y += target.bottom() - shift_region.top - allowance;
            }
        }
        if popup_bottom > shift_region.bottom {
            offset_y -= popup_bottom - shift_region.bottom;
            if target.top() > shift_region.bottom - allowance {
                offset_y += target.top() - shift_region.bottom + allowance;
            }
        }
    }

    // Arrow sits in the middle of the popup/target overlap on each axis
    let final_popup = popup.translated(offset_x, offset_y);
    let x_center = (final_popup.left().max(target.left()) + final_popup.right().min(target.right())) / 2.0;
    let y_center = (final_popup.top().max(target.top()) + final_popup.bottom().min(target.bottom())) / 2.0;
    let arrow_x = x_center - final_popup.left();
    let arrow_y = y_center - final_popup.top();

    let mut offset_r = input.popup_mirror.right() - popup.x - (offset_x + popup_width);
    let mut offset_b = input.popup_mirror.bottom() - popup.y - (offset_y + popup_height);

    let scale_x = input.scale_x;
    let scale_y = input.scale_y;
    if scale_x == 1.0 {
        offset_x = round_half_up(offset_x);
        offset_r = round_half_up(offset_r);
    }
    if scale_y == 1.0 {
        offset_y = round_half_up(offset_y);
        offset_b = round_half_up(offset_b);
    }

    let result = AlignResult {
        ready: true,
        offset_x: offset_x / scale_x,
        offset_y: offset_y / scale_y,
        offset_r: offset_r / scale_x,
        offset_b: offset_b / scale_y,
        arrow_x: arrow_x / scale_x,
        arrow_y: arrow_y / scale_y,
        scale_x,
        scale_y,
        align: next_align,
    };
    (result, flip)
}

/// Measure the DOM and run one alignment pass.
///
/// `None` means the pass was skipped (no document, zero-size popup, hidden
/// target) and the caller should keep its previous result.
pub fn align<H: LayoutHost>(
    host: &H,
    target: &AlignTarget<H::Element>,
    popup: &H::Element,
    placement: &Placement,
    flip: FlipMemory,
) -> Option<(AlignResult, FlipMemory)> {
    let Some(metrics) = host.document_metrics() else {
        debug!("Skipping alignment: no document");
        return None;
    };

    let target_rect = match target {
        AlignTarget::Element(element) => {
            if !is_visible(host, element) {
                debug!("Skipping alignment: target {element:?} is not visible");
                return None;
            }
            host.bounding_rect(element)
        }
        AlignTarget::Point(point) => Rect::from_point(*point),
    };

    let measurement = host.measure_popup(popup);
    let scale_x = scale_factor(measurement.rect.width, measurement.style_size.width);
    let scale_y = scale_factor(measurement.rect.height, measurement.style_size.height);
    if measurement.rect.size().is_empty() || scale_x == 0.0 || scale_y == 0.0 {
        debug!("Skipping alignment: popup {popup:?} has no size");
        return None;
    }

    let scrollers = collect_scrollers(host, popup);
    let (visible_base, scroll_base) = base_regions(&metrics);
    let input = AlignInput {
        target: target_rect,
        popup: measurement.rect,
        popup_mirror: measurement.mirror,
        scale_x,
        scale_y,
        placement,
        visible_region: compute_visible_area(host, visible_base, &scrollers),
        scroll_region: compute_visible_area(host, scroll_base, &scrollers),
    };

    let (result, next_flip) = compute_alignment(&input, flip);
    debug!(
        "Aligned popup {popup:?} at ({}, {}) with points {}, flips {next_flip:?}",
        result.offset_x, result.offset_y, result.align.points
    );
    Some((result, next_flip))
}
