//! `ResizeObserver` backend for the shared resize registry

use std::rc::{Rc, Weak};

use popalign_core::{ObserveBackend, ResizeRegistry};
use tracing::warn;
use wasm_bindgen_x::prelude::*;
use web_sys_x::{Element, ResizeObserver, ResizeObserverEntry};

/// One browser `ResizeObserver` feeding a [`ResizeRegistry`]
pub struct ResizeObserverBackend {
    observer: Option<ResizeObserver>,
    _callback: Closure<dyn FnMut(js_sys_x::Array)>,
}

impl ResizeObserverBackend {
    pub fn new(registry: Weak<ResizeRegistry<Element>>) -> Self {
        let callback: Closure<dyn FnMut(js_sys_x::Array)> =
            Closure::wrap(Box::new(move |entries: js_sys_x::Array| {
                let Some(registry) = registry.upgrade() else {
                    return;
                };
                for entry in entries.iter() {
                    if let Some(entry) = entry.dyn_ref::<ResizeObserverEntry>() {
                        registry.notify(&entry.target());
                    }
                }
            }) as Box<dyn FnMut(js_sys_x::Array)>);

        let observer = ResizeObserver::new(callback.as_ref().unchecked_ref()).ok();
        if observer.is_none() {
            warn!("ResizeObserver unavailable, popups won't follow size changes");
        }
        Self {
            observer,
            _callback: callback,
        }
    }
}

impl ObserveBackend<Element> for ResizeObserverBackend {
    fn observe(&self, element: &Element) {
        if let Some(observer) = &self.observer {
            observer.observe(element);
        }
    }

    fn unobserve(&self, element: &Element) {
        if let Some(observer) = &self.observer {
            observer.unobserve(element);
        }
    }
}

impl Drop for ResizeObserverBackend {
    fn drop(&mut self) {
        if let Some(observer) = &self.observer {
            observer.disconnect();
        }
    }
}

/// The registry to share between every popup on the page
pub fn shared_resize_registry() -> Rc<ResizeRegistry<Element>> {
    ResizeRegistry::new_shared(|registry| Box::new(ResizeObserverBackend::new(registry)))
}
