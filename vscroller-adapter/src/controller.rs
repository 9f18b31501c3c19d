use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use vscroller::{
    AnchorSample, FooterSlot, HeaderSlot, RecomputeResult, VScroller, VScrollerOptions,
    WindowState,
};

use crate::{
    Event, EventQueue, EventSender, IntersectionEntry, MeasurementReporter, ScrollSettle,
    Sentinel, SentinelProbe, SettleStatus, Subscription, Viewport, VisibilityWatcher,
    WatchOptions,
};

/// A framework-neutral reconciler that wraps a [`VScroller`] and its host collaborators.
///
/// This type does not hold any UI objects, only capability handles. Adapters drive it by:
/// - `connect` once the sentinels are mounted
/// - `process(now_ms)` after host callbacks have enqueued events
/// - `on_frame(now_ms)` each animation frame (drag settle detection)
/// - `after_render(now_ms)` after the host rendered a new window
/// - `teardown()` on unmount
///
/// Host callbacks never touch the engine directly; they enqueue through an [`EventSender`] and
/// the controller applies them in order, one recompute cycle per event.
pub struct Controller {
    engine: VScroller,
    viewport: Box<dyn Viewport>,
    probe: Box<dyn SentinelProbe>,
    queue: EventQueue,
    settle: ScrollSettle,
    watches: Vec<Subscription>,
    resize: Option<Subscription>,
    pending_correction: Option<f64>,
    torn_down: bool,
}

impl Controller {
    pub fn new(
        options: VScrollerOptions,
        viewport: Box<dyn Viewport>,
        probe: Box<dyn SentinelProbe>,
        now_ms: u64,
    ) -> Self {
        let engine = VScroller::new(options, probe.top_position(), viewport.height(), now_ms);
        Self {
            engine,
            viewport,
            probe,
            queue: EventQueue::new(),
            settle: ScrollSettle::new(),
            watches: Vec::new(),
            resize: None,
            pending_correction: None,
            torn_down: false,
        }
    }

    pub fn engine(&self) -> &VScroller {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut VScroller {
        &mut self.engine
    }

    pub fn state(&self) -> &Arc<WindowState> {
        self.engine.state()
    }

    pub fn viewport(&self) -> &dyn Viewport {
        self.viewport.as_ref()
    }

    pub fn header_slot(&self, sticky: bool) -> HeaderSlot {
        self.engine.header_slot(sticky)
    }

    pub fn footer_slot(&self, fixed_height: Option<f64>) -> FooterSlot {
        self.engine.footer_slot(fixed_height)
    }

    /// Scroll offset still waiting for the next `after_render`.
    pub fn pending_correction(&self) -> Option<f64> {
        self.pending_correction
    }

    pub fn is_settling(&self) -> bool {
        self.settle.is_pending()
    }

    pub fn is_connected(&self) -> bool {
        !self.watches.is_empty()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// A producer for host callbacks (data changes, measurements, custom triggers).
    pub fn sender(&self) -> EventSender {
        self.queue.sender()
    }

    /// Subscribes to viewport resizes and starts both visibility watches:
    /// - top and bottom sentinels, with the threshold as margin, to trigger rescans;
    /// - the rendered body, without margin, to detect drags that skip past the window.
    ///
    /// Reconnecting replaces the previous watches.
    pub fn connect(&mut self, watcher: &mut dyn VisibilityWatcher) {
        if self.torn_down {
            vwarn!("Controller::connect after teardown");
            return;
        }
        if self.resize.is_none() {
            let sender = self.queue.sender();
            self.resize = Some(self.viewport.on_resize(Box::new(move || {
                let _ = sender.send(Event::Resized);
            })));
        }

        // Dropping the old handles disconnects them.
        self.watches.clear();
        let root = self.viewport.root();
        let threshold = self.engine.threshold();
        vdebug!(threshold, has_root = root.is_some(), "Controller::connect");

        let sender = self.queue.sender();
        self.watches.push(watcher.observe(
            &[Sentinel::Top, Sentinel::Bottom],
            WatchOptions {
                root,
                margin_px: threshold,
            },
            Box::new(move |entries: &[IntersectionEntry]| {
                let _ = sender.send(Event::Intersections(entries.to_vec()));
            }),
        ));

        let sender = self.queue.sender();
        self.watches.push(watcher.observe(
            &[Sentinel::Body],
            WatchOptions {
                root,
                margin_px: 0.0,
            },
            Box::new(move |entries: &[IntersectionEntry]| {
                let _ = sender.send(Event::Intersections(entries.to_vec()));
            }),
        ));
    }

    /// Changes the threshold. The sentinel watch margin depends on it, so a connected
    /// controller re-observes with `watcher`.
    pub fn set_threshold(&mut self, threshold: f64, watcher: &mut dyn VisibilityWatcher) {
        self.engine.set_threshold(threshold);
        if self.is_connected() {
            self.connect(watcher);
        }
    }

    /// Records a measurement without starting a cycle.
    pub fn measure(&mut self, index: usize, height: f64) {
        if self.torn_down {
            return;
        }
        self.engine.measure(index, height);
    }

    /// Hooks up an item's height source.
    ///
    /// An item with a fixed height is written to the cache immediately and needs no reporter
    /// subscription.
    pub fn watch_item(
        &mut self,
        index: usize,
        fixed_height: Option<f64>,
        reporter: &mut dyn MeasurementReporter,
    ) -> Subscription {
        if self.torn_down {
            return Subscription::empty();
        }
        if let Some(height) = fixed_height {
            self.engine.measure(index, height);
            return Subscription::empty();
        }
        let sender = self.queue.sender();
        reporter.observe_height(Box::new(move |height| {
            let _ = sender.measured(index, height);
        }))
    }

    /// Drains the event queue in order.
    ///
    /// Returns the new state when any cycle replaced it, `None` when the host has nothing to
    /// re-render.
    pub fn process(&mut self, now_ms: u64) -> Option<Arc<WindowState>> {
        if self.torn_down {
            return None;
        }
        let before = Arc::clone(self.engine.state());
        while let Some(event) = self.queue.pop() {
            self.handle(event, now_ms);
        }
        self.changed_since(&before)
    }

    /// Advances the drag settle detector by one frame. Runs exactly one update cycle when
    /// the top sentinel has held still across two frames.
    pub fn on_frame(&mut self, now_ms: u64) -> Option<Arc<WindowState>> {
        if self.torn_down {
            return None;
        }
        match self.settle.poll(self.probe.top_position()) {
            SettleStatus::Settled => {
                let before = Arc::clone(self.engine.state());
                self.update(now_ms);
                self.changed_since(&before)
            }
            SettleStatus::Idle | SettleStatus::Pending => None,
        }
    }

    /// Per-render pass: applies the pending scroll correction (once), then reconciles fillers
    /// and grows the window to fill the viewport.
    ///
    /// Returns `None` after teardown.
    pub fn after_render(&mut self, now_ms: u64) -> Option<RecomputeResult> {
        if self.torn_down {
            return None;
        }
        if let Some(scroll_top) = self.pending_correction.take() {
            vtrace!(scroll_top, "Controller: applying scroll correction");
            self.viewport.set_scroll_top(scroll_top);
        }
        let height = self.viewport.height();
        Some(self.engine.after_render(height, now_ms))
    }

    /// Disconnects every subscription, cancels the settle detector and drops queued events.
    /// Everything after this is a no-op.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        vdebug!(queued = self.queue.len(), "Controller::teardown");
        self.torn_down = true;
        self.watches.clear();
        self.resize = None;
        self.settle.cancel();
        self.queue.close();
        self.pending_correction = None;
    }

    fn handle(&mut self, event: Event, now_ms: u64) {
        match event {
            Event::Intersections(entries) => {
                let rescan = entries
                    .iter()
                    .any(|e| e.sentinel != Sentinel::Body && e.is_intersecting);
                let body_left = entries
                    .iter()
                    .any(|e| e.sentinel == Sentinel::Body && !e.is_intersecting);
                if rescan {
                    self.update(now_ms);
                }
                if body_left {
                    let _ = self.settle.start(self.probe.top_position());
                }
            }
            Event::Resized => {
                let _ = self.engine.on_viewport_resize(self.viewport.height());
            }
            Event::Measured { index, height } => self.engine.measure(index, height),
            Event::CountChanged(count) => {
                let _ = self.engine.set_count(count, now_ms);
            }
            Event::UpdateSignal(signal) => {
                let _ = self.engine.set_update_signal(signal, now_ms);
            }
            Event::Refresh => {
                let _ = self.engine.refresh(now_ms);
            }
        }
    }

    fn update(&mut self, now_ms: u64) {
        let sample = AnchorSample {
            position: self.probe.top_position(),
            viewport_height: self.viewport.height(),
            scroll_top: self.viewport.scroll_top(),
        };
        let out = self.engine.on_visibility(sample, now_ms);
        if let Some(scroll_top) = out.scroll_correction {
            self.pending_correction = Some(scroll_top);
        }
    }

    fn changed_since(&self, before: &Arc<WindowState>) -> Option<Arc<WindowState>> {
        let after = self.engine.state();
        (!Arc::ptr_eq(before, after)).then(|| Arc::clone(after))
    }
}

impl fmt::Debug for Controller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controller")
            .field("engine", &self.engine)
            .field("queued", &self.queue.len())
            .field("settle", &self.settle)
            .field("watches", &self.watches.len())
            .field("pending_correction", &self.pending_correction)
            .field("torn_down", &self.torn_down)
            .finish_non_exhaustive()
    }
}
