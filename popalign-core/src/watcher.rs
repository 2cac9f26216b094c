//! Scroll and resize subscriptions for an open popup.
//!
//! A popup has to follow its target when anything between the target and
//! the viewport scrolls, and when the window is resized. [`watch`] attaches
//! one shared callback to every relevant scroller plus the window and hands
//! back a [`Watch`] guard. Dropping the guard detaches everything.

use std::fmt;
use std::rc::Rc;

use tracing::debug;

use crate::align::AlignTarget;
use crate::dom::LayoutHost;
use crate::scroller::collect_scrollers;

/// Something a listener can be attached to
#[derive(Debug, Clone, PartialEq)]
pub enum WatchTarget<E> {
    Window,
    Element(E),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchEvent {
    Scroll,
    Resize,
}

impl WatchEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Scroll => "scroll",
            Self::Resize => "resize",
        }
    }
}

/// Attaches passive event listeners.
///
/// `Listener` is a guard: the listener stays attached exactly as long as the
/// returned value is alive.
pub trait EventSource<E> {
    type Listener;

    fn listen(&self, target: &WatchTarget<E>, event: WatchEvent, callback: Rc<dyn Fn()>) -> Self::Listener;
}

/// Live subscription. Drop to unsubscribe.
pub struct Watch<L> {
    listeners: Vec<L>,
    scroll_targets: usize,
}

impl<L> Watch<L> {
    /// Number of scroll targets, the window included
    pub fn scroll_targets(&self) -> usize {
        self.scroll_targets
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl<L> fmt::Debug for Watch<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Watch")
            .field("listeners", &self.listeners.len())
            .field("scroll_targets", &self.scroll_targets)
            .finish()
    }
}

impl<L> Drop for Watch<L> {
    fn drop(&mut self) {
        debug!("Unsubscribing {} popup listeners", self.listeners.len());
    }
}

/// Subscribe to everything that can move `popup` relative to `target`.
///
/// Returns `None` when not open. Every event runs `on_align` and then
/// `on_scroll`. `on_align` is also called once before this returns; a
/// coalescing `on_align` such as [`PopupAligner::trigger_align`] only queues
/// the first pass, which then runs on the next tick.
///
/// [`PopupAligner::trigger_align`]: crate::PopupAligner::trigger_align
pub fn watch<H, S>(
    open: bool,
    host: &H,
    events: &S,
    target: &AlignTarget<H::Element>,
    popup: &H::Element,
    on_align: Rc<dyn Fn()>,
    on_scroll: Rc<dyn Fn()>,
) -> Option<Watch<S::Listener>>
where
    H: LayoutHost,
    S: EventSource<H::Element>,
{
    if !open {
        return None;
    }

    let mut scroll_targets = vec![WatchTarget::Window];
    let target_scrollers = match target {
        AlignTarget::Element(element) => collect_scrollers(host, element),
        AlignTarget::Point(_) => Vec::new(),
    };
    for scroller in target_scrollers
        .into_iter()
        .chain(collect_scrollers(host, popup))
    {
        let scroll_target = WatchTarget::Element(scroller);
        if !scroll_targets.contains(&scroll_target) {
            scroll_targets.push(scroll_target);
        }
    }

    let notify: Rc<dyn Fn()> = {
        let on_align = on_align.clone();
        Rc::new(move || {
            on_align();
            on_scroll();
        })
    };

    let mut listeners: Vec<S::Listener> = scroll_targets
        .iter()
        .map(|scroll_target| events.listen(scroll_target, WatchEvent::Scroll, notify.clone()))
        .collect();
    listeners.push(events.listen(&WatchTarget::Window, WatchEvent::Resize, notify));

    debug!(
        "Subscribed popup {popup:?} to {} scroll targets",
        scroll_targets.len()
    );

    on_align();

    Some(Watch {
        listeners,
        scroll_targets: scroll_targets.len(),
    })
}
