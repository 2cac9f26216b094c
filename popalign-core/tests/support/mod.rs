//! In-memory DOM, event source and microtask queue for integration tests.
#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use popalign_core::common::{Rect, Size};
use popalign_core::{
    ComputedBox, DocumentMetrics, Edges, ElementKind, EventSource, LayoutHost, Microtask,
    ObserveBackend, OverflowStyle, PopupMeasurement, WatchEvent, WatchTarget,
};

/// Initialize tracing for tests
pub fn tracing_init() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_line_number(true)
        .with_target(false)
        .with_file(true)
        .try_init();
}

pub type NodeId = usize;

pub const HTML: NodeId = 0;
pub const BODY: NodeId = 1;

#[derive(Debug, Clone)]
struct FakeNode {
    parent: Option<NodeId>,
    kind: ElementKind,
    computed: ComputedBox,
    rect: Rect,
    offset: Size,
    client: Size,
    has_offset_parent: bool,
    shadow_host: Option<NodeId>,
}

#[derive(Debug)]
struct Tree {
    nodes: Vec<FakeNode>,
    metrics: Option<DocumentMetrics>,
    measure_calls: usize,
}

/// A document with `<html>` and `<body>`, 1000x1000 viewport, no scrolling.
///
/// Clones share the same tree, so a test can keep a handle while the
/// aligner owns another.
#[derive(Debug, Clone)]
pub struct FakeDom {
    tree: Rc<RefCell<Tree>>,
}

impl FakeDom {
    pub fn new() -> Self {
        let root = |parent, kind| FakeNode {
            parent,
            kind,
            computed: ComputedBox::default(),
            rect: Rect::new(0.0, 0.0, 1000.0, 1000.0),
            offset: Size::new(1000.0, 1000.0),
            client: Size::new(1000.0, 1000.0),
            has_offset_parent: true,
            shadow_host: None,
        };
        let metrics = DocumentMetrics {
            client_width: 1000.0,
            client_height: 1000.0,
            scroll_width: 1000.0,
            scroll_height: 1000.0,
            scroll_top: 0.0,
            scroll_left: 0.0,
        };
        Self {
            tree: Rc::new(RefCell::new(Tree {
                nodes: vec![
                    root(None, ElementKind::Html),
                    root(Some(HTML), ElementKind::Body),
                ],
                metrics: Some(metrics),
                measure_calls: 0,
            })),
        }
    }

    /// Add a plain element laid out at `rect`
    pub fn add(&self, parent: NodeId, rect: Rect) -> NodeId {
        let mut tree = self.tree.borrow_mut();
        tree.nodes.push(FakeNode {
            parent: Some(parent),
            kind: ElementKind::Other,
            computed: ComputedBox {
                width: rect.width,
                height: rect.height,
                ..Default::default()
            },
            rect,
            offset: rect.size(),
            client: rect.size(),
            has_offset_parent: true,
            shadow_host: None,
        });
        tree.nodes.len() - 1
    }

    /// Add an `overflow: auto` container
    pub fn add_scroller(&self, parent: NodeId, rect: Rect) -> NodeId {
        let id = self.add(parent, rect);
        self.set_overflow(id, OverflowStyle::Auto);
        id
    }

    pub fn set_overflow(&self, id: NodeId, overflow: OverflowStyle) {
        self.tree.borrow_mut().nodes[id].computed.overflow = overflow;
    }

    pub fn set_rect(&self, id: NodeId, rect: Rect) {
        self.tree.borrow_mut().nodes[id].rect = rect;
    }

    /// Borders and a client box smaller than the border box (scrollbars)
    pub fn set_box(&self, id: NodeId, border: Edges, client: Size) {
        let mut tree = self.tree.borrow_mut();
        tree.nodes[id].computed.border = border;
        tree.nodes[id].client = client;
    }

    /// `display: none`: no offset parent, nothing laid out
    pub fn hide(&self, id: NodeId) {
        let mut tree = self.tree.borrow_mut();
        let node = &mut tree.nodes[id];
        node.has_offset_parent = false;
        node.rect = Rect::new(0.0, 0.0, 0.0, 0.0);
    }

    pub fn set_shadow_host(&self, id: NodeId, host: NodeId) {
        self.tree.borrow_mut().nodes[id].shadow_host = Some(host);
    }

    pub fn set_metrics(&self, metrics: Option<DocumentMetrics>) {
        self.tree.borrow_mut().metrics = metrics;
    }

    pub fn measure_calls(&self) -> usize {
        self.tree.borrow().measure_calls
    }
}

impl LayoutHost for FakeDom {
    type Element = NodeId;

    fn parent_element(&self, element: &NodeId) -> Option<NodeId> {
        self.tree.borrow().nodes[*element].parent
    }

    fn element_kind(&self, element: &NodeId) -> ElementKind {
        self.tree.borrow().nodes[*element].kind
    }

    fn computed_box(&self, element: &NodeId) -> ComputedBox {
        self.tree.borrow().nodes[*element].computed
    }

    fn bounding_rect(&self, element: &NodeId) -> Rect {
        self.tree.borrow().nodes[*element].rect
    }

    fn offset_size(&self, element: &NodeId) -> Size {
        self.tree.borrow().nodes[*element].offset
    }

    fn client_size(&self, element: &NodeId) -> Size {
        self.tree.borrow().nodes[*element].client
    }

    fn has_offset_parent(&self, element: &NodeId) -> bool {
        self.tree.borrow().nodes[*element].has_offset_parent
    }

    fn bbox_size(&self, _element: &NodeId) -> Option<Size> {
        None
    }

    fn shadow_host(&self, element: &NodeId) -> Option<NodeId> {
        self.tree.borrow().nodes[*element].shadow_host
    }

    fn document_metrics(&self) -> Option<DocumentMetrics> {
        self.tree.borrow().metrics
    }

    /// Pinned at the viewport's top-left and bottom-right corners
    fn measure_popup(&self, popup: &NodeId) -> PopupMeasurement {
        let mut tree = self.tree.borrow_mut();
        tree.measure_calls += 1;
        let node = &tree.nodes[*popup];
        let size = node.rect.size();
        let (client_width, client_height) = tree
            .metrics
            .map_or((0.0, 0.0), |m| (m.client_width, m.client_height));
        PopupMeasurement {
            rect: Rect::new(0.0, 0.0, size.width, size.height),
            mirror: Rect::new(
                client_width - size.width,
                client_height - size.height,
                size.width,
                size.height,
            ),
            style_size: Size::new(node.computed.width, node.computed.height),
        }
    }
}

type Registered = (u64, WatchTarget<NodeId>, WatchEvent, Rc<dyn Fn()>);

/// Records listeners; `fire` plays an event to them
#[derive(Clone, Default)]
pub struct FakeEvents {
    listeners: Rc<RefCell<Vec<Registered>>>,
    next_id: Rc<Cell<u64>>,
}

/// Removes its listener on drop
pub struct FakeListener {
    id: u64,
    listeners: Rc<RefCell<Vec<Registered>>>,
}

impl Drop for FakeListener {
    fn drop(&mut self) {
        self.listeners.borrow_mut().retain(|(id, ..)| *id != self.id);
    }
}

impl FakeEvents {
    pub fn fire(&self, target: &WatchTarget<NodeId>, event: WatchEvent) {
        let callbacks: Vec<Rc<dyn Fn()>> = self
            .listeners
            .borrow()
            .iter()
            .filter(|(_, t, e, _)| t == target && *e == event)
            .map(|(.., callback)| callback.clone())
            .collect();
        for callback in callbacks {
            callback();
        }
    }

    pub fn count(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn count_for(&self, target: &WatchTarget<NodeId>, event: WatchEvent) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|(_, t, e, _)| t == target && *e == event)
            .count()
    }
}

impl EventSource<NodeId> for FakeEvents {
    type Listener = FakeListener;

    fn listen(
        &self,
        target: &WatchTarget<NodeId>,
        event: WatchEvent,
        callback: Rc<dyn Fn()>,
    ) -> FakeListener {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.listeners
            .borrow_mut()
            .push((id, target.clone(), event, callback));
        FakeListener {
            id,
            listeners: self.listeners.clone(),
        }
    }
}

/// Microtask queue drained by hand
#[derive(Default)]
pub struct TaskQueue {
    tasks: RefCell<VecDeque<Box<dyn FnOnce()>>>,
}

impl TaskQueue {
    /// Run everything queued, including tasks queued while draining
    pub fn drain(&self) -> usize {
        let mut ran = 0;
        loop {
            let task = self.tasks.borrow_mut().pop_front();
            let Some(task) = task else {
                break;
            };
            task();
            ran += 1;
        }
        ran
    }

    pub fn pending(&self) -> usize {
        self.tasks.borrow().len()
    }
}

impl Microtask for TaskQueue {
    fn queue(&self, task: Box<dyn FnOnce()>) {
        self.tasks.borrow_mut().push_back(task);
    }
}

/// Resize backend recording what is observed
#[derive(Clone, Default)]
pub struct FakeObserver {
    pub observed: Rc<RefCell<Vec<NodeId>>>,
}

impl ObserveBackend<NodeId> for FakeObserver {
    fn observe(&self, element: &NodeId) {
        self.observed.borrow_mut().push(*element);
    }

    fn unobserve(&self, element: &NodeId) {
        self.observed.borrow_mut().retain(|e| e != element);
    }
}
