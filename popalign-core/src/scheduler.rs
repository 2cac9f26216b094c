//! Coalescing of alignment requests.
//!
//! Scroll, resize and state changes can all ask for a realignment in the
//! same tick. Each pass reads layout, so only the last request queued before
//! the executor runs actually does anything.

use std::cell::Cell;
use std::rc::Rc;

/// Runs a task after the current synchronous work, before the next paint
/// (a microtask in the browser)
pub trait Microtask {
    fn queue(&self, task: Box<dyn FnOnce()>);
}

/// Latest-generation-wins scheduler
#[derive(Clone)]
pub struct AlignScheduler {
    executor: Rc<dyn Microtask>,
    generation: Rc<Cell<u64>>,
}

impl AlignScheduler {
    pub fn new(executor: Rc<dyn Microtask>) -> Self {
        Self {
            executor,
            generation: Rc::new(Cell::new(0)),
        }
    }

    /// Queue `run`, superseding anything requested earlier that hasn't run yet
    pub fn request(&self, run: impl FnOnce() + 'static) {
        let id = self.generation.get().wrapping_add(1);
        self.generation.set(id);

        let generation = self.generation.clone();
        self.executor.queue(Box::new(move || {
            if generation.get() == id {
                run();
            }
        }));
    }

    /// Drop every pending request
    pub fn cancel(&self) {
        self.generation.set(self.generation.get().wrapping_add(1));
    }

    /// Hand a one-off task to the executor, outside the coalescing
    pub fn defer(&self, task: impl FnOnce() + 'static) {
        self.executor.queue(Box::new(task));
    }
}
