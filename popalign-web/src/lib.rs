//! popalign-web - Browser binding for popalign-core
//!
//! Implements the engine's DOM abstraction on `web-sys-x`, plus the event,
//! resize and microtask plumbing a [`PopupAligner`] needs in a page.

mod dom;
mod listener;
mod resize;

pub use dom::WebDom;
pub use listener::{EventListener, WebEvents};
pub use resize::{shared_resize_registry, ResizeObserverBackend};

use std::rc::Rc;

use popalign_core::{AlignConfig, ConfigError, Microtask, PopupAligner, PopupInset};
use wasm_bindgen_x::JsCast;
use web_sys_x::{Element, HtmlElement};

pub type WebAligner = PopupAligner<WebDom, WebEvents>;

/// Runs tasks on the browser's microtask queue
#[derive(Debug, Clone, Copy, Default)]
pub struct SpawnLocal;

impl Microtask for SpawnLocal {
    fn queue(&self, task: Box<dyn FnOnce()>) {
        wasm_bindgen_futures_x::spawn_local(async move { task() });
    }
}

/// An aligner for the current page
pub fn web_aligner(config: &AlignConfig) -> Result<WebAligner, ConfigError> {
    PopupAligner::from_config(WebDom, WebEvents, config, Rc::new(SpawnLocal))
}

/// Write the aligner's current position onto the popup (and arrow) inline
/// styles
pub fn apply_position(aligner: &WebAligner, popup: &Element, arrow: Option<&Element>) {
    if let Some(popup) = popup.dyn_ref::<HtmlElement>() {
        set_inset(popup, &aligner.inset());
    }

    let arrow = arrow.and_then(|arrow| arrow.dyn_ref::<HtmlElement>());
    let (Some(arrow), Some(position)) = (arrow, aligner.arrow()) else {
        return;
    };
    let style = arrow.style();
    let sides = [
        ("top", position.top),
        ("bottom", position.bottom),
        ("left", position.left),
        ("right", position.right),
    ];
    for (side, value) in sides {
        if let Some(px) = value {
            style.set_property(side, &format!("{px}px")).ok();
        } else {
            style.remove_property(side).ok();
        }
    }
}

fn set_inset(popup: &HtmlElement, inset: &PopupInset) {
    let style = popup.style();
    let sides = [
        ("left", inset.left),
        ("top", inset.top),
        ("right", inset.right),
        ("bottom", inset.bottom),
    ];
    for (side, value) in sides {
        style.set_property(side, &value.to_string()).ok();
    }
}
