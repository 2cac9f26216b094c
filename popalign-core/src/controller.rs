//! Per-popup alignment controller
//!
//! [`PopupAligner`] owns everything one popup needs between passes: whether
//! it is open, which placement it uses, the flip memory, the latest result
//! and the live scroll/resize subscriptions. The rendering layer calls
//! [`PopupAligner::open`] and [`PopupAligner::close`] and reads back
//! [`PopupAligner::inset`], [`PopupAligner::arrow`] and
//! [`PopupAligner::popup_class`].

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicBool, Ordering};

use popalign_common::Point;
use tracing::{debug, warn};

use crate::align::{align, AlignResult, AlignTarget, FlipMemory};
use crate::arrow::{ArrowPosition, PopupInset};
use crate::config::{AlignConfig, ConfigError};
use crate::dom::LayoutHost;
use crate::placement::{Placement, PlacementOverride, PlacementTable};
use crate::resize::{ResizeHandle, ResizeRegistry};
use crate::scheduler::{AlignScheduler, Microtask};
use crate::watcher::{watch, EventSource, Watch};

/// Set once the shadow root mismatch has been reported
static SHADOW_MISMATCH_WARNED: AtomicBool = AtomicBool::new(false);

/// What to do after something scrolled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollAction {
    Realign,
    /// Point-anchored popups can't follow a scroll, they close instead
    Close,
}

struct State<E, L> {
    open: bool,
    target: Option<AlignTarget<E>>,
    popup: Option<E>,
    placement_name: String,
    placement: Placement,
    flip: FlipMemory,
    result: AlignResult,
    watch: Option<Watch<L>>,
    resize_handles: Vec<ResizeHandle>,
}

struct Inner<H: LayoutHost, S: EventSource<H::Element>> {
    host: H,
    events: S,
    table: PlacementTable,
    close_on_scroll_for_point: bool,
    scheduler: AlignScheduler,
    resize: RefCell<Option<Rc<ResizeRegistry<H::Element>>>>,
    on_close: RefCell<Option<Rc<dyn Fn()>>>,
    state: RefCell<State<H::Element, S::Listener>>,
}

/// Alignment state for one popup. Cheap to clone, clones share state.
pub struct PopupAligner<H: LayoutHost, S: EventSource<H::Element>> {
    inner: Rc<Inner<H, S>>,
}

impl<H: LayoutHost, S: EventSource<H::Element>> Clone for PopupAligner<H, S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<H, S> PopupAligner<H, S>
where
    H: LayoutHost + 'static,
    S: EventSource<H::Element> + 'static,
    H::Element: 'static,
{
    /// Start closed with the table's `default_placement`
    pub fn new(
        host: H,
        events: S,
        table: PlacementTable,
        default_placement: &str,
        executor: Rc<dyn Microtask>,
    ) -> Self {
        Self::build(host, events, table, default_placement, true, executor)
    }

    pub fn from_config(
        host: H,
        events: S,
        config: &AlignConfig,
        executor: Rc<dyn Microtask>,
    ) -> Result<Self, ConfigError> {
        let table = config.placement_table()?;
        Ok(Self::build(
            host,
            events,
            table,
            &config.default_placement,
            config.close_on_scroll_for_point,
            executor,
        ))
    }

    fn build(
        host: H,
        events: S,
        table: PlacementTable,
        default_placement: &str,
        close_on_scroll_for_point: bool,
        executor: Rc<dyn Microtask>,
    ) -> Self {
        let placement = table.resolve(default_placement, &PlacementOverride::default());
        let state = State {
            open: false,
            target: None,
            popup: None,
            placement_name: default_placement.to_string(),
            result: AlignResult::pending(placement.clone()),
            placement,
            flip: FlipMemory::default(),
            watch: None,
            resize_handles: Vec::new(),
        };
        Self {
            inner: Rc::new(Inner {
                host,
                events,
                table,
                close_on_scroll_for_point,
                scheduler: AlignScheduler::new(executor),
                resize: RefCell::new(None),
                on_close: RefCell::new(None),
                state: RefCell::new(state),
            }),
        }
    }

    /// Realign when the target or popup changes size. Takes effect on the
    /// next `open`.
    pub fn set_resize_registry(&self, registry: Rc<ResizeRegistry<H::Element>>) {
        *self.inner.resize.borrow_mut() = Some(registry);
    }

    /// Called after the popup closed itself (point-anchored popup scrolled)
    pub fn set_on_close(&self, on_close: impl Fn() + 'static) {
        *self.inner.on_close.borrow_mut() = Some(Rc::new(on_close));
    }

    pub fn host(&self) -> &H {
        &self.inner.host
    }

    pub fn is_open(&self) -> bool {
        self.inner.state.borrow().open
    }

    /// Show the popup at `target` and start following it.
    ///
    /// Reopening with different elements drops the old subscriptions first.
    pub fn open(&self, target: AlignTarget<H::Element>, popup: H::Element) {
        self.close();
        let inner = &self.inner;

        if let AlignTarget::Element(element) = &target {
            let target_root = inner.host.shadow_host(element);
            let popup_root = inner.host.shadow_host(&popup);
            if target_root != popup_root && !SHADOW_MISMATCH_WARNED.swap(true, Ordering::Relaxed) {
                warn!(
                    "Popup {popup:?} and its target {element:?} are in different shadow roots; \
                     click-outside detection will misbehave"
                );
            }
        }

        {
            let mut state = inner.state.borrow_mut();
            state.open = true;
            state.target = Some(target.clone());
            state.popup = Some(popup.clone());
            state.result = AlignResult::pending(state.placement.clone());
        }

        let weak = Rc::downgrade(inner);
        let on_align: Rc<dyn Fn()> = {
            let weak = weak.clone();
            Rc::new(move || {
                if let Some(aligner) = Self::upgrade(&weak) {
                    aligner.trigger_align();
                }
            })
        };
        let on_scroll: Rc<dyn Fn()> = {
            let weak = weak.clone();
            Rc::new(move || {
                if let Some(aligner) = Self::upgrade(&weak) {
                    if aligner.handle_scroll() == ScrollAction::Close {
                        aligner.close_from_scroll();
                    }
                }
            })
        };
        let subscription = watch(
            true,
            &inner.host,
            &inner.events,
            &target,
            &popup,
            on_align,
            on_scroll,
        );

        let mut resize_handles = Vec::new();
        if let Some(registry) = inner.resize.borrow().as_ref() {
            let mut observed = vec![popup];
            if let AlignTarget::Element(element) = target {
                observed.push(element);
            }
            for element in &observed {
                let weak = weak.clone();
                let handle = registry.register(
                    element,
                    Rc::new(move |_: &H::Element| {
                        if let Some(aligner) = Self::upgrade(&weak) {
                            aligner.trigger_align();
                        }
                    }),
                );
                resize_handles.push(handle);
            }
        }

        let mut state = inner.state.borrow_mut();
        state.watch = subscription;
        state.resize_handles = resize_handles;
        debug!("Opened popup with placement {:?}", state.placement_name);
    }

    /// Hide the popup: detach listeners, forget flips, drop pending passes.
    pub fn close(&self) {
        let inner = &self.inner;
        let (subscription, handles) = {
            let mut state = inner.state.borrow_mut();
            if !state.open {
                return;
            }
            state.open = false;
            state.flip = FlipMemory::default();
            state.result.ready = false;
            (state.watch.take(), std::mem::take(&mut state.resize_handles))
        };
        inner.scheduler.cancel();

        if let Some(registry) = inner.resize.borrow().as_ref() {
            for handle in handles {
                registry.unregister(handle);
            }
        }
        drop(subscription);
        debug!("Closed popup");
    }

    /// Switch to a named placement, with caller overrides on top.
    ///
    /// Marks the result not ready until the next pass.
    pub fn set_placement(&self, name: &str, patch: &PlacementOverride) {
        let inner = &self.inner;
        if inner.table.get(name).is_none() {
            debug!("Unknown placement {name:?}, using defaults");
        }
        let placement = inner.table.resolve(name, patch);
        let open = {
            let mut state = inner.state.borrow_mut();
            state.placement_name = name.to_string();
            state.flip = FlipMemory::default();
            state.result = AlignResult::pending(placement.clone());
            state.placement = placement;
            state.open
        };
        if open {
            self.trigger_align();
        }
    }

    /// Move a point-anchored popup (context menu following the mouse)
    pub fn set_align_point(&self, point: Point) {
        let open = {
            let mut state = self.inner.state.borrow_mut();
            match state.target {
                Some(AlignTarget::Point(_)) => {
                    state.target = Some(AlignTarget::Point(point));
                    state.open
                }
                _ => false,
            }
        };
        if open {
            self.trigger_align();
        }
    }

    /// Run one alignment pass right now.
    ///
    /// Returns whether a new result was produced; a skipped pass keeps the
    /// previous one.
    pub fn align_now(&self) -> bool {
        let inner = &self.inner;
        let (target, popup, placement, flip) = {
            let state = inner.state.borrow();
            match (&state.target, &state.popup) {
                (Some(target), Some(popup)) if state.open => (
                    target.clone(),
                    popup.clone(),
                    state.placement.clone(),
                    state.flip,
                ),
                _ => return false,
            }
        };

        let Some((result, next_flip)) = align(&inner.host, &target, &popup, &placement, flip) else {
            return false;
        };

        let mut state = inner.state.borrow_mut();
        state.flip = next_flip;
        state.result = result;
        true
    }

    /// Ask for a pass at the end of the current tick. Requests made in the
    /// same tick collapse into one.
    pub fn trigger_align(&self) {
        let weak = Rc::downgrade(&self.inner);
        self.inner.scheduler.request(move || {
            if let Some(aligner) = Self::upgrade(&weak) {
                aligner.align_now();
            }
        });
    }

    pub fn handle_scroll(&self) -> ScrollAction {
        let state = self.inner.state.borrow();
        let point_anchored = matches!(state.target, Some(AlignTarget::Point(_)));
        if state.open && point_anchored && self.inner.close_on_scroll_for_point {
            ScrollAction::Close
        } else {
            ScrollAction::Realign
        }
    }

    pub fn result(&self) -> AlignResult {
        self.inner.state.borrow().result.clone()
    }

    pub fn flip_memory(&self) -> FlipMemory {
        self.inner.state.borrow().flip
    }

    pub fn arrow(&self) -> Option<ArrowPosition> {
        ArrowPosition::from_result(&self.inner.state.borrow().result)
    }

    pub fn inset(&self) -> PopupInset {
        let state = self.inner.state.borrow();
        PopupInset::from_result(&state.result, state.open)
    }

    /// `{prefix}-placement-{name}` for the placement actually in use, so a
    /// flipped tooltip gets the flipped side's styling
    pub fn popup_class(&self, prefix: &str) -> Option<String> {
        let state = self.inner.state.borrow();
        let popup_only = matches!(state.target, Some(AlignTarget::Point(_)));
        self.inner
            .table
            .name_for(&state.result.align.points, popup_only)
            .map(|name| format!("{prefix}-placement-{name}"))
    }

    /// The scroll callback runs inside a listener owned by the watch, so the
    /// watch can't be dropped from there.
    fn close_from_scroll(&self) {
        let weak = Rc::downgrade(&self.inner);
        self.inner.scheduler.defer(move || {
            let Some(aligner) = Self::upgrade(&weak) else {
                return;
            };
            if !aligner.is_open() {
                return;
            }
            debug!("Closing point-anchored popup on scroll");
            aligner.close();
            let on_close = aligner.inner.on_close.borrow().clone();
            if let Some(on_close) = on_close {
                on_close();
            }
        });
    }

    fn upgrade(weak: &Weak<Inner<H, S>>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }
}
