use crate::*;

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use vscroller::VScrollerOptions;

#[derive(Default)]
struct ViewportModel {
    height: f64,
    scroll_top: f64,
    scroll_writes: Vec<f64>,
    resize_listeners: Vec<Option<ResizeCallback>>,
}

#[derive(Clone)]
struct FakeViewport {
    model: Rc<RefCell<ViewportModel>>,
    root: Option<ElementHandle>,
}

impl FakeViewport {
    fn new(height: f64, root: Option<ElementHandle>) -> Self {
        let model = ViewportModel {
            height,
            ..ViewportModel::default()
        };
        Self {
            model: Rc::new(RefCell::new(model)),
            root,
        }
    }

    fn scroll(&self, scroll_top: f64) {
        self.model.borrow_mut().scroll_top = scroll_top;
    }

    fn resize(&self, height: f64) {
        let mut listeners = {
            let mut model = self.model.borrow_mut();
            model.height = height;
            core::mem::take(&mut model.resize_listeners)
        };
        for cb in listeners.iter_mut().flatten() {
            cb();
        }
        self.model.borrow_mut().resize_listeners = listeners;
    }

    fn active_resize_listeners(&self) -> usize {
        self.model
            .borrow()
            .resize_listeners
            .iter()
            .filter(|l| l.is_some())
            .count()
    }

    fn scroll_writes(&self) -> Vec<f64> {
        self.model.borrow().scroll_writes.clone()
    }
}

impl Viewport for FakeViewport {
    fn height(&self) -> f64 {
        self.model.borrow().height
    }

    fn scroll_top(&self) -> f64 {
        self.model.borrow().scroll_top
    }

    fn set_scroll_top(&mut self, value: f64) {
        let mut model = self.model.borrow_mut();
        model.scroll_top = value;
        model.scroll_writes.push(value);
    }

    fn root(&self) -> Option<ElementHandle> {
        self.root
    }

    fn on_resize(&mut self, callback: ResizeCallback) -> Subscription {
        let idx = {
            let mut model = self.model.borrow_mut();
            model.resize_listeners.push(Some(callback));
            model.resize_listeners.len() - 1
        };
        let model = Rc::clone(&self.model);
        Subscription::new(move || {
            if let Some(slot) = model.borrow_mut().resize_listeners.get_mut(idx) {
                *slot = None;
            }
        })
    }
}

struct Watch {
    targets: Vec<Sentinel>,
    options: WatchOptions,
    callback: Option<IntersectionCallback>,
}

#[derive(Clone, Default)]
struct FakeWatcher {
    watches: Rc<RefCell<Vec<Watch>>>,
}

impl FakeWatcher {
    fn fire(&self, entries: &[IntersectionEntry]) {
        let mut watches = self.watches.borrow_mut();
        for w in watches.iter_mut() {
            let mine: Vec<_> = entries
                .iter()
                .copied()
                .filter(|e| w.targets.contains(&e.sentinel))
                .collect();
            if mine.is_empty() {
                continue;
            }
            if let Some(cb) = w.callback.as_mut() {
                cb(&mine);
            }
        }
    }

    fn active(&self) -> Vec<(Vec<Sentinel>, WatchOptions)> {
        self.watches
            .borrow()
            .iter()
            .filter(|w| w.callback.is_some())
            .map(|w| (w.targets.clone(), w.options))
            .collect()
    }

    fn total(&self) -> usize {
        self.watches.borrow().len()
    }
}

impl VisibilityWatcher for FakeWatcher {
    fn observe(
        &mut self,
        targets: &[Sentinel],
        options: WatchOptions,
        callback: IntersectionCallback,
    ) -> Subscription {
        let idx = {
            let mut watches = self.watches.borrow_mut();
            watches.push(Watch {
                targets: targets.to_vec(),
                options,
                callback: Some(callback),
            });
            watches.len() - 1
        };
        let watches = Rc::clone(&self.watches);
        Subscription::new(move || {
            if let Some(w) = watches.borrow_mut().get_mut(idx) {
                w.callback = None;
            }
        })
    }
}

#[derive(Clone, Default)]
struct FakeReporter {
    callback: Rc<RefCell<Option<Box<dyn FnMut(f64)>>>>,
}

impl FakeReporter {
    fn report(&self, height: f64) {
        if let Some(cb) = self.callback.borrow_mut().as_mut() {
            cb(height);
        }
    }

    fn is_observed(&self) -> bool {
        self.callback.borrow().is_some()
    }
}

impl MeasurementReporter for FakeReporter {
    fn observe_height(&mut self, callback: Box<dyn FnMut(f64)>) -> Subscription {
        *self.callback.borrow_mut() = Some(callback);
        let slot = Rc::clone(&self.callback);
        Subscription::new(move || {
            *slot.borrow_mut() = None;
        })
    }
}

struct Harness {
    controller: Controller,
    viewport: FakeViewport,
    watcher: FakeWatcher,
    top: Rc<Cell<f64>>,
}

impl Harness {
    /// Moves the top sentinel and the viewport together, as a real scroll would.
    fn scroll_to(&self, offset: f64) {
        self.top.set(-offset);
        self.viewport.scroll(offset);
    }
}

fn harness(count: usize, page_size: usize, threshold: f64, row: Option<f64>) -> Harness {
    let viewport = FakeViewport::new(400.0, Some(ElementHandle(7)));
    let top = Rc::new(Cell::new(0.0));
    let probe = {
        let top = Rc::clone(&top);
        move || top.get()
    };
    let opts = VScrollerOptions::new(count)
        .with_page_size(page_size)
        .with_threshold(threshold);
    let mut controller = Controller::new(opts, Box::new(viewport.clone()), Box::new(probe), 0);
    if let Some(row) = row {
        for i in 0..count {
            controller.measure(i, row);
        }
    }
    let mut watcher = FakeWatcher::default();
    controller.connect(&mut watcher);
    Harness {
        controller,
        viewport,
        watcher,
        top,
    }
}

fn entry(sentinel: Sentinel, is_intersecting: bool) -> IntersectionEntry {
    IntersectionEntry {
        sentinel,
        is_intersecting,
    }
}

#[test]
fn connect_registers_sentinel_body_and_resize_watches() {
    let h = harness(1000, 10, 300.0, None);
    let active = h.watcher.active();
    assert_eq!(active.len(), 2);

    assert_eq!(active[0].0, [Sentinel::Top, Sentinel::Bottom]);
    assert_eq!(active[0].1.root, Some(ElementHandle(7)));
    assert_eq!(active[0].1.margin_px, 300.0);

    assert_eq!(active[1].0, [Sentinel::Body]);
    assert_eq!(active[1].1.margin_px, 0.0);

    assert_eq!(h.viewport.active_resize_listeners(), 1);
    assert!(h.controller.is_connected());
}

#[test]
fn sentinel_intersection_moves_window_and_corrects_scroll_once() {
    let mut h = harness(1000, 10, 300.0, Some(50.0));
    h.scroll_to(2000.0);
    h.watcher.fire(&[entry(Sentinel::Bottom, true)]);

    let state = h.controller.process(1).expect("window should move");
    // 2000 - 300 = 1700 = 34 rows of 50px.
    assert_eq!(state.range.start(), 34);
    assert_eq!(state.range.end(), 44);
    assert_eq!(h.controller.pending_correction(), Some(2000.0));

    let _ = h.controller.after_render(2);
    assert_eq!(h.viewport.scroll_writes(), [2000.0]);
    assert_eq!(h.controller.pending_correction(), None);

    let _ = h.controller.after_render(3);
    assert_eq!(h.viewport.scroll_writes().len(), 1);
}

#[test]
fn non_intersecting_sentinels_do_not_rescan() {
    let mut h = harness(1000, 10, 300.0, Some(50.0));
    h.scroll_to(2000.0);
    h.watcher
        .fire(&[entry(Sentinel::Top, false), entry(Sentinel::Bottom, false)]);

    assert!(h.controller.process(1).is_none());
    assert_eq!(h.controller.state().range.start(), 0);
    assert_eq!(h.controller.pending_correction(), None);
}

#[test]
fn body_leaving_viewport_updates_once_after_scroll_settles() {
    let mut h = harness(1000, 10, 300.0, Some(50.0));
    h.scroll_to(3000.0);
    h.watcher.fire(&[entry(Sentinel::Body, false)]);

    assert!(h.controller.process(1).is_none());
    assert!(h.controller.is_settling());

    // Still moving.
    h.scroll_to(3500.0);
    assert!(h.controller.on_frame(2).is_none());
    assert!(h.controller.is_settling());

    // Stable across two frames.
    let state = h.controller.on_frame(3).expect("settled scroll should update");
    assert_eq!(state.range.start(), 64);
    assert!(!h.controller.is_settling());
    assert!(h.controller.on_frame(4).is_none());
}

#[test]
fn body_entering_viewport_does_not_start_settle() {
    let mut h = harness(1000, 10, 300.0, Some(50.0));
    h.watcher.fire(&[entry(Sentinel::Body, true)]);
    assert!(h.controller.process(1).is_none());
    assert!(!h.controller.is_settling());
}

#[test]
fn viewport_resize_keeps_only_rendered_measurements() {
    let mut h = harness(1000, 10, 300.0, Some(50.0));
    assert_eq!(h.controller.engine().sizes().known_len(), 1000);

    h.viewport.resize(400.0);
    let _ = h.controller.process(1);
    assert_eq!(h.controller.engine().sizes().known_len(), 1000);

    h.viewport.resize(800.0);
    let _ = h.controller.process(2);
    assert_eq!(h.controller.engine().viewport_height(), 800.0);
    assert_eq!(h.controller.engine().sizes().known_len(), 10);
    assert!(h.controller.engine().sizes().is_known(9));
    assert!(!h.controller.engine().sizes().is_known(10));
}

#[test]
fn item_measurements_are_queued_and_fixed_heights_written_directly() {
    let mut h = harness(100, 10, 300.0, None);
    let mut reporter = FakeReporter::default();
    let sub = h.controller.watch_item(3, None, &mut reporter);
    assert!(sub.is_active());

    reporter.report(42.0);
    assert_eq!(h.controller.engine().sizes().get(3), 0.0);
    // Measurements never start a cycle on their own.
    assert!(h.controller.process(1).is_none());
    assert_eq!(h.controller.engine().sizes().get(3), 42.0);

    let mut fixed = FakeReporter::default();
    let none = h.controller.watch_item(5, Some(30.0), &mut fixed);
    assert!(!none.is_active());
    assert!(!fixed.is_observed());
    assert_eq!(h.controller.engine().sizes().get(5), 30.0);

    drop(sub);
    assert!(!reporter.is_observed());
}

#[test]
fn data_events_reconcile_through_the_queue() {
    let mut h = harness(1000, 10, 300.0, Some(50.0));
    let sender = h.controller.sender();

    assert!(sender.send(Event::CountChanged(5)));
    let state = h.controller.process(1).expect("count change");
    assert_eq!(state.count, 5);
    assert_eq!((state.range.start(), state.range.end()), (0, 5));
    assert!(!state.range.more());
    assert_eq!(state.version, 1);
    assert_eq!(h.controller.engine().sizes().known_len(), 0);

    assert!(sender.send(Event::UpdateSignal(9)));
    assert_eq!(h.controller.process(2).map(|s| s.version), Some(2));

    // Same signal again: nothing to do.
    assert!(sender.send(Event::UpdateSignal(9)));
    assert!(h.controller.process(3).is_none());

    assert!(sender.send(Event::Refresh));
    assert_eq!(h.controller.process(4).map(|s| s.version), Some(3));
}

#[test]
fn set_threshold_reobserves_with_new_margin() {
    let mut h = harness(1000, 10, 300.0, None);
    let mut watcher = h.watcher.clone();
    h.controller.set_threshold(120.0, &mut watcher);

    assert_eq!(h.watcher.total(), 4);
    let active = h.watcher.active();
    assert_eq!(active.len(), 2);
    assert_eq!(active[0].1.margin_px, 120.0);
    assert_eq!(h.controller.engine().threshold(), 120.0);
    // The resize listener is not duplicated.
    assert_eq!(h.viewport.active_resize_listeners(), 1);
}

#[test]
fn teardown_disconnects_and_ignores_later_events() {
    let mut h = harness(1000, 10, 300.0, Some(50.0));
    h.scroll_to(3000.0);
    h.watcher.fire(&[entry(Sentinel::Body, false)]);
    let _ = h.controller.process(1);
    assert!(h.controller.is_settling());

    let sender = h.controller.sender();
    assert!(sender.send(Event::Refresh));
    let before = h.controller.state().clone();

    h.controller.teardown();
    assert!(h.controller.is_torn_down());
    assert!(h.watcher.active().is_empty());
    assert_eq!(h.viewport.active_resize_listeners(), 0);
    assert!(!h.controller.is_settling());

    assert!(!sender.send(Event::Refresh));
    h.watcher.fire(&[entry(Sentinel::Top, true)]);
    h.viewport.resize(900.0);
    assert!(h.controller.process(2).is_none());
    assert!(h.controller.on_frame(3).is_none());
    assert!(h.controller.after_render(4).is_none());
    assert!(alloc::sync::Arc::ptr_eq(&before, h.controller.state()));

    // Idempotent.
    h.controller.teardown();
}

#[test]
fn slots_share_the_engine_reservations() {
    let h = harness(1000, 10, 300.0, None);
    let _footer = h.controller.footer_slot(Some(40.0));
    let header = h.controller.header_slot(false);
    header.on_resize(25.0);

    let reserved = h.controller.engine().reservations().get();
    assert_eq!(reserved.footer, 40.0);
    assert_eq!(reserved.header, 25.0);
}

#[derive(Clone, Copy, Debug)]
struct NodeData {
    parent: Option<usize>,
    position: Position,
    overflow: (Overflow, Overflow),
}

#[derive(Clone, Debug)]
struct TreeNode {
    tree: Rc<Vec<NodeData>>,
    id: usize,
}

impl ScrollNode for TreeNode {
    fn position(&self) -> Position {
        self.tree[self.id].position
    }

    fn overflow(&self) -> (Overflow, Overflow) {
        self.tree[self.id].overflow
    }

    fn parent(&self) -> Option<Self> {
        self.tree[self.id].parent.map(|id| Self {
            tree: Rc::clone(&self.tree),
            id,
        })
    }
}

fn node(parent: Option<usize>, position: Position, x: Overflow, y: Overflow) -> NodeData {
    NodeData {
        parent,
        position,
        overflow: (x, y),
    }
}

fn test_tree() -> Rc<Vec<NodeData>> {
    use Overflow::*;
    use Position::*;
    Rc::new(alloc::vec![
        node(None, Static, Visible, Visible),       // 0: document root
        node(Some(0), Relative, Visible, Auto),     // 1: positioned scroller
        node(Some(1), Static, Hidden, Scroll),      // 2: static scroller
        node(Some(2), Static, Visible, Visible),    // 3: plain child
        node(Some(2), Absolute, Visible, Visible),  // 4: absolute child
        node(Some(2), Fixed, Visible, Visible),     // 5: fixed child
        node(Some(0), Static, Visible, Visible),    // 6: no scrolling ancestor
        node(Some(0), Static, Auto, Auto),          // 7: scrolls itself only
        node(Some(0), Relative, Scroll, Visible),   // 8: horizontal scroller
        node(Some(8), Static, Visible, Visible),    // 9: child of 8
    ])
}

fn resolve(tree: &Rc<Vec<NodeData>>, id: usize) -> Option<usize> {
    let n = TreeNode {
        tree: Rc::clone(tree),
        id,
    };
    match find_scroll_parent(&n) {
        ScrollParent::Window => None,
        ScrollParent::Container(p) => Some(p.id),
    }
}

#[test]
fn scroll_parent_resolution_rules() {
    let tree = test_tree();
    assert_eq!(resolve(&tree, 3), Some(2));
    assert_eq!(resolve(&tree, 4), Some(1), "absolute skips static ancestors");
    assert_eq!(resolve(&tree, 5), None, "fixed scrolls with the window");
    assert_eq!(resolve(&tree, 6), None);
    assert_eq!(resolve(&tree, 7), None, "a node is not its own scroll parent");
    assert_eq!(resolve(&tree, 9), Some(8), "either axis counts");
}

#[derive(Clone, Default)]
struct FakeWindow {
    scroll_top: Rc<Cell<f64>>,
}

impl WindowHost for FakeWindow {
    fn inner_height(&self) -> f64 {
        768.0
    }

    fn scroll_top(&self) -> f64 {
        self.scroll_top.get()
    }

    fn set_scroll_top(&mut self, value: f64) {
        self.scroll_top.set(value);
    }

    fn on_resize(&mut self, _callback: ResizeCallback) -> Subscription {
        Subscription::empty()
    }
}

struct FakeContainer {
    id: usize,
    scroll_top: f64,
}

impl ScrollContainer for FakeContainer {
    fn handle(&self) -> ElementHandle {
        ElementHandle(self.id as u64)
    }

    fn offset_height(&self) -> f64 {
        250.0
    }

    fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    fn set_scroll_top(&mut self, value: f64) {
        self.scroll_top = value;
    }

    fn on_resize(&mut self, _callback: ResizeCallback) -> Subscription {
        Subscription::empty()
    }
}

#[test]
fn select_viewport_picks_variant_from_scroll_parent() {
    let tree = test_tree();
    let bind = |n: TreeNode| FakeContainer {
        id: n.id,
        scroll_top: 0.0,
    };

    let inside = TreeNode {
        tree: Rc::clone(&tree),
        id: 3,
    };
    let mut vp = select_viewport(&inside, FakeWindow::default(), bind);
    assert_eq!(vp.root(), Some(ElementHandle(2)));
    assert_eq!(vp.height(), 250.0);
    vp.set_scroll_top(12.0);
    assert_eq!(vp.scroll_top(), 12.0);

    let window = FakeWindow::default();
    let top_level = TreeNode { tree, id: 6 };
    let mut vp = select_viewport(&top_level, window.clone(), bind);
    assert_eq!(vp.root(), None);
    assert_eq!(vp.height(), 768.0);
    vp.set_scroll_top(99.0);
    assert_eq!(window.scroll_top.get(), 99.0);
}

#[test]
fn scroll_settle_requires_two_equal_samples() {
    let mut s = ScrollSettle::new();
    assert_eq!(s.poll(0.0), SettleStatus::Idle);

    let _ = s.start(10.0);
    assert_eq!(s.poll(12.0), SettleStatus::Pending);
    assert_eq!(s.poll(12.0), SettleStatus::Settled);
    assert_eq!(s.poll(12.0), SettleStatus::Idle);
}

#[test]
fn scroll_settle_restart_and_cancel() {
    let mut s = ScrollSettle::new();
    let first = s.start(0.0);
    let second = s.start(5.0);
    assert!(first.is_cancelled());
    assert!(!second.is_cancelled());
    assert_eq!(s.poll(5.0), SettleStatus::Settled);

    let token = s.start(0.0);
    s.cancel();
    assert!(token.is_cancelled());
    assert!(!s.is_pending());
    assert_eq!(s.poll(0.0), SettleStatus::Idle);

    let token = s.start(0.0);
    token.cancel();
    assert!(!s.is_pending());
    assert_eq!(s.poll(0.0), SettleStatus::Idle);
}

#[test]
fn subscription_runs_teardown_exactly_once() {
    let calls = Rc::new(Cell::new(0));

    let c = Rc::clone(&calls);
    let sub = Subscription::new(move || c.set(c.get() + 1));
    assert!(sub.is_active());
    sub.unsubscribe();
    assert_eq!(calls.get(), 1);

    let c = Rc::clone(&calls);
    let sub = Subscription::new(move || c.set(c.get() + 1));
    drop(sub);
    assert_eq!(calls.get(), 2);

    assert!(!Subscription::empty().is_active());
}

#[test]
fn event_queue_is_fifo_and_close_drops_pending() {
    let q = EventQueue::new();
    let tx = q.sender();
    assert!(tx.send(Event::Refresh));
    assert!(tx.measured(1, 20.0));
    assert!(tx.send(Event::CountChanged(3)));
    assert_eq!(q.len(), 3);

    assert_eq!(q.pop(), Some(Event::Refresh));
    assert_eq!(
        q.pop(),
        Some(Event::Measured {
            index: 1,
            height: 20.0
        })
    );

    q.close();
    assert!(q.is_closed());
    assert!(q.is_empty());
    assert!(!tx.send(Event::Refresh));
    assert_eq!(q.pop(), None);
}
