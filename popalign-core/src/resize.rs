//! Shared resize observation.
//!
//! Every popup wants to know when its target or itself changes size. The
//! registry keeps one backend observation per element no matter how many
//! popups care about it, and fans notifications out to all of them.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use tracing::debug;

/// The actual observer (a browser `ResizeObserver`, or a fake in tests)
pub trait ObserveBackend<E> {
    fn observe(&self, element: &E);
    fn unobserve(&self, element: &E);
}

pub type ResizeCallback<E> = Rc<dyn Fn(&E)>;

/// Returned by [`ResizeRegistry::register`], pass back to unregister
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResizeHandle(u64);

struct Entry<E> {
    element: E,
    callbacks: Vec<(ResizeHandle, ResizeCallback<E>)>,
}

/// Reference-counted element -> callbacks map over a single backend.
///
/// Create one at startup and share it (`Rc`) with every popup controller.
pub struct ResizeRegistry<E> {
    backend: Box<dyn ObserveBackend<E>>,
    entries: RefCell<Vec<Entry<E>>>,
    next_handle: Cell<u64>,
}

impl<E: Clone + PartialEq> ResizeRegistry<E> {
    pub fn new(backend: Box<dyn ObserveBackend<E>>) -> Self {
        Self {
            backend,
            entries: RefCell::new(Vec::new()),
            next_handle: Cell::new(0),
        }
    }

    /// Build a shared registry whose backend needs to call back into it
    pub fn new_shared(make_backend: impl FnOnce(Weak<Self>) -> Box<dyn ObserveBackend<E>>) -> Rc<Self> {
        Rc::new_cyclic(|weak| Self::new(make_backend(weak.clone())))
    }

    pub fn register(&self, element: &E, callback: ResizeCallback<E>) -> ResizeHandle {
        let handle = ResizeHandle(self.next_handle.get());
        self.next_handle.set(handle.0 + 1);

        let mut entries = self.entries.borrow_mut();
        match entries.iter_mut().find(|entry| entry.element == *element) {
            Some(entry) => entry.callbacks.push((handle, callback)),
            None => {
                entries.push(Entry {
                    element: element.clone(),
                    callbacks: vec![(handle, callback)],
                });
                self.backend.observe(element);
            }
        }
        handle
    }

    /// Remove one callback; the element stops being observed with its last
    /// callback. Returns `false` for an unknown handle.
    pub fn unregister(&self, handle: ResizeHandle) -> bool {
        let mut entries = self.entries.borrow_mut();
        let Some(index) = entries
            .iter()
            .position(|entry| entry.callbacks.iter().any(|(h, _)| *h == handle))
        else {
            return false;
        };

        let entry = &mut entries[index];
        entry.callbacks.retain(|(h, _)| *h != handle);
        if entry.callbacks.is_empty() {
            let entry = entries.remove(index);
            self.backend.unobserve(&entry.element);
        }
        true
    }

    /// Deliver a size change for `element` to everyone registered for it
    pub fn notify(&self, element: &E) {
        // Callbacks may register/unregister, so don't hold the borrow
        let callbacks: Vec<ResizeCallback<E>> = self
            .entries
            .borrow()
            .iter()
            .find(|entry| entry.element == *element)
            .map(|entry| entry.callbacks.iter().map(|(_, cb)| cb.clone()).collect())
            .unwrap_or_default();
        for callback in callbacks {
            callback(element);
        }
    }

    /// Stop observing everything
    pub fn clear(&self) {
        let entries = std::mem::take(&mut *self.entries.borrow_mut());
        debug!("Clearing resize registry ({} elements)", entries.len());
        for entry in entries {
            self.backend.unobserve(&entry.element);
        }
    }

    pub fn observed_count(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn callback_count(&self, element: &E) -> usize {
        self.entries
            .borrow()
            .iter()
            .find(|entry| entry.element == *element)
            .map_or(0, |entry| entry.callbacks.len())
    }
}
