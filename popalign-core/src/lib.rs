//! popalign-core - Popup alignment engine
//!
//! Positions popups (tooltips, dropdowns, context menus) next to a target
//! element or point, flipping and shifting them to stay inside the part of
//! the page the user can actually see.

pub mod align;
pub mod arrow;
pub mod config;
pub mod controller;
pub mod dom;
pub mod placement;
pub mod resize;
pub mod scheduler;
pub mod scroller;
pub mod visible_area;
pub mod watcher;

pub use align::{align, compute_alignment, AlignInput, AlignResult, AlignTarget, FlipMemory};
pub use arrow::{ArrowPosition, Length, PopupInset};
pub use config::{AlignConfig, ConfigError, PlacementEntry};
pub use controller::{PopupAligner, ScrollAction};
pub use dom::{
    is_visible, parse_px, ComputedBox, DocumentMetrics, Edges, ElementKind, LayoutHost,
    OverflowStyle, PopupMeasurement,
};
pub use placement::{HtmlRegion, Placement, PlacementOverride, PlacementTable};
pub use resize::{ObserveBackend, ResizeCallback, ResizeHandle, ResizeRegistry};
pub use scheduler::{AlignScheduler, Microtask};
pub use scroller::collect_scrollers;
pub use visible_area::{base_regions, clip_box, compute_visible_area};
pub use watcher::{watch, EventSource, Watch, WatchEvent, WatchTarget};

pub use popalign_common as common;
