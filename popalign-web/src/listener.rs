//! Passive DOM event listeners
//!
//! Same cleanup pattern as any `Closure`-backed listener: the closure lives
//! in a struct that removes the listener in `Drop`, so the listener's
//! lifetime is tied to Rust ownership instead of leaking via `forget()`.

use std::rc::Rc;

use popalign_core::{EventSource, WatchEvent, WatchTarget};
use tracing::trace;
use wasm_bindgen_x::prelude::*;
use web_sys_x::{AddEventListenerOptions, Element, EventTarget};

/// A passive event listener that removes itself when dropped.
pub struct EventListener {
    target: EventTarget,
    event_name: &'static str,
    callback: Closure<dyn FnMut(JsValue)>,
}

impl EventListener {
    /// Attaches a passive listener to `target`.
    pub fn new(
        target: EventTarget,
        event_name: &'static str,
        callback: impl FnMut(JsValue) + 'static,
    ) -> Self {
        let callback: Closure<dyn FnMut(JsValue)> = Closure::wrap(Box::new(callback));

        let options = AddEventListenerOptions::new();
        options.set_passive(true);
        target
            .add_event_listener_with_callback_and_add_event_listener_options(
                event_name,
                callback.as_ref().unchecked_ref(),
                &options,
            )
            .ok();

        Self {
            target,
            event_name,
            callback,
        }
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        let _ = self.target.remove_event_listener_with_callback(
            self.event_name,
            self.callback.as_ref().unchecked_ref(),
        );
    }
}

/// [`EventSource`] over the current window
#[derive(Debug, Clone, Copy, Default)]
pub struct WebEvents;

impl EventSource<Element> for WebEvents {
    /// `None` when there is no window to listen on
    type Listener = Option<EventListener>;

    fn listen(
        &self,
        target: &WatchTarget<Element>,
        event: WatchEvent,
        callback: Rc<dyn Fn()>,
    ) -> Option<EventListener> {
        let event_target: EventTarget = match target {
            WatchTarget::Window => web_sys_x::window()?.into(),
            WatchTarget::Element(element) => element.clone().into(),
        };
        trace!("Listening for {} on {target:?}", event.name());
        Some(EventListener::new(event_target, event.name(), move |_| {
            callback()
        }))
    }
}
