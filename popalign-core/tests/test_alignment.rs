//! Alignment against a fake DOM.
//!
//! Tests:
//! - Simple tooltip and forced flip through `align`
//! - Scroller clipping shrinks the visible region and changes the outcome
//! - Adding scrollers only ever shrinks the visible region
//! - Skipped passes (hidden target, no document)
mod support;
use crate::support::{tracing_init, FakeDom, BODY};
use popalign_core::common::{AnchorPoints, Point, Rect, Region, Size};
use popalign_core::{
    align, base_regions, collect_scrollers, compute_visible_area, AlignTarget, Edges,
    FlipMemory, PlacementTable,
};

fn placement(name: &str) -> popalign_core::Placement {
    PlacementTable::builtin().get(name).cloned().unwrap()
}

fn viewport(dom: &FakeDom) -> Region {
    use popalign_core::LayoutHost;
    base_regions(&dom.document_metrics().unwrap()).0
}

#[test]
fn test_simple_tooltip() {
    tracing_init();
    let dom = FakeDom::new();
    let target = dom.add(BODY, Rect::new(100.0, 100.0, 50.0, 20.0));
    let popup = dom.add(BODY, Rect::new(0.0, 0.0, 200.0, 40.0));

    let (result, flip) = align(
        &dom,
        &AlignTarget::Element(target),
        &popup,
        &placement("top"),
        FlipMemory::default(),
    )
    .unwrap();

    assert!(result.ready);
    assert_eq!(result.offset_x, 100.0 + 50.0 / 2.0 - 200.0 / 2.0);
    assert_eq!(result.offset_y, 100.0 - 40.0 - 4.0);
    assert_eq!(result.scale_x, 1.0);
    assert!(flip.is_empty());
}

#[test]
fn test_forced_flip_to_bottom() {
    tracing_init();
    let dom = FakeDom::new();
    let target = dom.add(BODY, Rect::new(100.0, 10.0, 50.0, 20.0));
    let popup = dom.add(BODY, Rect::new(0.0, 0.0, 200.0, 40.0));

    let (result, flip) = align(
        &dom,
        &AlignTarget::Element(target),
        &popup,
        &placement("top"),
        FlipMemory::default(),
    )
    .unwrap();

    assert_eq!(result.align.points, AnchorPoints::parse("tc", "bc").unwrap());
    assert!(result.offset_y > 10.0 + 20.0);
    assert!(flip.tb);
}

#[test]
fn test_scroller_clipping() {
    tracing_init();
    let dom = FakeDom::new();
    let scroller = dom.add_scroller(BODY, Rect::new(100.0, 100.0, 100.0, 100.0));
    let target = dom.add(scroller, Rect::new(120.0, 170.0, 50.0, 20.0));
    let popup = dom.add(scroller, Rect::new(0.0, 0.0, 60.0, 40.0));

    let scrollers = collect_scrollers(&dom, &popup);
    assert_eq!(scrollers, vec![scroller]);
    let visible = compute_visible_area(&dom, viewport(&dom), &scrollers);
    assert_eq!(visible, Region::new(100.0, 100.0, 200.0, 200.0));

    // Below the target only 6px of the popup would show inside the scroller
    let (result, _) = align(
        &dom,
        &AlignTarget::Element(target),
        &popup,
        &placement("bottom"),
        FlipMemory::default(),
    )
    .unwrap();
    assert_eq!(result.align.points, AnchorPoints::parse("bc", "tc").unwrap());
    assert_eq!(result.offset_y, 170.0 - 40.0 - 4.0);
}

#[test]
fn test_scroller_borders_and_scrollbar() {
    let dom = FakeDom::new();
    let scroller = dom.add_scroller(BODY, Rect::new(100.0, 100.0, 100.0, 100.0));
    // 2px border all round, 10px vertical scrollbar
    dom.set_box(
        scroller,
        Edges {
            top: 2.0,
            right: 2.0,
            bottom: 2.0,
            left: 2.0,
        },
        Size::new(86.0, 96.0),
    );
    let popup = dom.add(scroller, Rect::new(0.0, 0.0, 60.0, 40.0));

    let scrollers = collect_scrollers(&dom, &popup);
    let visible = compute_visible_area(&dom, viewport(&dom), &scrollers);
    assert_eq!(visible, Region::new(102.0, 102.0, 188.0, 198.0));
}

#[test]
fn test_nested_scrollers_only_shrink() {
    let dom = FakeDom::new();
    let outer = dom.add_scroller(BODY, Rect::new(50.0, 50.0, 400.0, 300.0));
    let middle = dom.add_scroller(outer, Rect::new(-20.0, 100.0, 300.0, 500.0));
    let inner = dom.add_scroller(middle, Rect::new(300.0, 120.0, 400.0, 50.0));
    let popup = dom.add(inner, Rect::new(0.0, 0.0, 10.0, 10.0));

    let scrollers = collect_scrollers(&dom, &popup);
    assert_eq!(scrollers, vec![inner, middle, outer]);

    let base = viewport(&dom);
    let mut previous = base;
    for count in 1..=scrollers.len() {
        let area = compute_visible_area(&dom, base, &scrollers[..count]);
        assert!(area.left >= previous.left, "{area:?} vs {previous:?}");
        assert!(area.top >= previous.top, "{area:?} vs {previous:?}");
        assert!(area.right <= previous.right, "{area:?} vs {previous:?}");
        assert!(area.bottom <= previous.bottom, "{area:?} vs {previous:?}");
        assert!(area.left <= area.right && area.top <= area.bottom);
        previous = area;
    }
}

#[test]
fn test_body_and_html_are_not_scrollers_for_the_region() {
    let dom = FakeDom::new();
    dom.set_overflow(BODY, popalign_core::OverflowStyle::Hidden);
    let popup = dom.add(BODY, Rect::new(0.0, 0.0, 10.0, 10.0));

    let scrollers = collect_scrollers(&dom, &popup);
    assert_eq!(scrollers, vec![BODY]);
    assert_eq!(
        compute_visible_area(&dom, viewport(&dom), &scrollers),
        viewport(&dom)
    );
}

#[test]
fn test_point_target() {
    let dom = FakeDom::new();
    let popup = dom.add(BODY, Rect::new(0.0, 0.0, 120.0, 80.0));

    let (result, _) = align(
        &dom,
        &AlignTarget::Point(Point::new(300.0, 400.0)),
        &popup,
        &placement("bottomLeft"),
        FlipMemory::default(),
    )
    .unwrap();
    assert_eq!((result.offset_x, result.offset_y), (300.0, 404.0));
}

#[test]
fn test_skips_hidden_target() {
    tracing_init();
    let dom = FakeDom::new();
    let target = dom.add(BODY, Rect::new(100.0, 100.0, 50.0, 20.0));
    let popup = dom.add(BODY, Rect::new(0.0, 0.0, 200.0, 40.0));
    dom.hide(target);

    let outcome = align(
        &dom,
        &AlignTarget::Element(target),
        &popup,
        &placement("top"),
        FlipMemory::default(),
    );
    assert!(outcome.is_none());
}

#[test]
fn test_skips_empty_popup_and_missing_document() {
    let dom = FakeDom::new();
    let target = dom.add(BODY, Rect::new(100.0, 100.0, 50.0, 20.0));
    let empty = dom.add(BODY, Rect::new(0.0, 0.0, 0.0, 40.0));
    let popup = dom.add(BODY, Rect::new(0.0, 0.0, 200.0, 40.0));
    let target = AlignTarget::Element(target);

    assert!(align(&dom, &target, &empty, &placement("top"), FlipMemory::default()).is_none());

    dom.set_metrics(None);
    assert!(align(&dom, &target, &popup, &placement("top"), FlipMemory::default()).is_none());
}

#[test]
fn test_scaled_popup() {
    let dom = FakeDom::new();
    let target = dom.add(BODY, Rect::new(100.0, 100.0, 50.0, 20.0));
    // Rendered at half its layout size (transform: scale(0.5) on an ancestor)
    let popup = dom.add(BODY, Rect::new(0.0, 0.0, 200.0, 40.0));
    dom.set_rect(popup, Rect::new(0.0, 0.0, 100.0, 20.0));

    let (result, _) = align(
        &dom,
        &AlignTarget::Element(target),
        &popup,
        &placement("bottomLeft"),
        FlipMemory::default(),
    )
    .unwrap();
    assert_eq!(result.scale_x, 0.5);
    assert_eq!(result.offset_x, 200.0);
    assert_eq!(result.offset_y, (120.0 + 4.0) / 0.5);
}
