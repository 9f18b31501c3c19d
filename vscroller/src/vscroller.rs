use alloc::sync::Arc;

use crate::{
    AnchorSample, DirectionalRescan, FooterSlot, HeaderSlot, Range, Reservations, SizeCache,
    VScrollerOptions, WindowState, adjust_page_size, apply_filler_adjustments,
    reconcile_data_change,
};

/// Output of one recompute cycle.
#[derive(Clone, Debug, PartialEq)]
#[must_use]
pub struct RecomputeResult {
    /// The state after the cycle. Same `Arc` as before when nothing changed.
    pub state: Arc<WindowState>,
    /// Whether `state` is a new snapshot.
    pub changed: bool,
    /// One-shot instruction: move the viewport to this scroll offset once the new window has
    /// rendered. Nothing else holds on to it, so applying it consumes it.
    pub scroll_correction: Option<f64>,
}

impl RecomputeResult {
    pub fn into_parts(self) -> (Arc<WindowState>, Option<f64>) {
        (self.state, self.scroll_correction)
    }
}

/// The windowing engine.
///
/// UI-agnostic: it holds no UI objects. The host drives it with discrete events (visibility,
/// resize, measurement, data changes, render passes) and gets a [`RecomputeResult`] back from
/// each cycle. A cycle reads one snapshot and produces one replacement.
///
/// Measurements (`measure`) and header/footer reservations are written out of band and never
/// trigger a cycle themselves; the next cycle picks them up.
///
/// Threading: `VScroller` is `Send` but not `Sync`. It can move to another thread, but one
/// thread drives it at a time (the size cache memoizes its average in a `Cell`). Snapshots,
/// the `on_range_changed` callback and [`Reservations`] handles are `Send + Sync`, so they
/// can be shared with other threads.
#[derive(Clone, Debug)]
pub struct VScroller {
    options: VScrollerOptions,
    state: Arc<WindowState>,
    sizes: SizeCache,
    reservations: Reservations,
    rescan: DirectionalRescan,
    viewport_height: f64,
}

impl VScroller {
    /// Creates an engine at mount time.
    ///
    /// `anchor_position` is the top sentinel's current screen position and `viewport_height`
    /// the current viewport height; both are the baselines later events are compared to.
    pub fn new(
        options: VScrollerOptions,
        anchor_position: f64,
        viewport_height: f64,
        now_ms: u64,
    ) -> Self {
        let page_size = options.effective_page_size();
        let threshold = options.effective_threshold();
        vdebug!(
            count = options.count,
            page_size,
            threshold,
            "VScroller::new"
        );
        Self {
            state: Arc::new(WindowState::initial(page_size, options.count, now_ms)),
            sizes: SizeCache::new(options.count),
            reservations: Reservations::new(),
            rescan: DirectionalRescan::new(anchor_position, threshold),
            viewport_height,
            options,
        }
    }

    pub fn options(&self) -> &VScrollerOptions {
        &self.options
    }

    pub fn state(&self) -> &Arc<WindowState> {
        &self.state
    }

    pub fn range(&self) -> Range {
        self.state.range
    }

    pub fn count(&self) -> usize {
        self.state.count
    }

    pub fn sizes(&self) -> &SizeCache {
        &self.sizes
    }

    /// A handle to the header/footer side-channel. Clones share the same cell.
    pub fn reservations(&self) -> Reservations {
        self.reservations.clone()
    }

    pub fn header_slot(&self, sticky: bool) -> HeaderSlot {
        HeaderSlot::new(self.reservations(), sticky)
    }

    pub fn footer_slot(&self, fixed_height: Option<f64>) -> FooterSlot {
        FooterSlot::new(self.reservations(), fixed_height)
    }

    /// Anchor position recorded by the last visibility cycle.
    pub fn anchor_position(&self) -> f64 {
        self.rescan.last_position()
    }

    pub fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    /// Effective (clamped) pre-fetch margin.
    pub fn threshold(&self) -> f64 {
        self.rescan.threshold()
    }

    /// Records an item's rendered height (measured, or declared fixed by the item).
    ///
    /// Does not start a cycle. Indexes past `count` are ignored.
    pub fn measure(&mut self, index: usize, height: f64) {
        if index >= self.state.count {
            vtrace!(index, count = self.state.count, "measure: index out of range");
            return;
        }
        self.sizes.set(index, height);
    }

    pub fn measure_many(&mut self, measurements: impl IntoIterator<Item = (usize, f64)>) {
        for (index, height) in measurements {
            self.measure(index, height);
        }
    }

    /// Runs a cycle for a sentinel visibility event: rescan, then filler reconciliation.
    ///
    /// When the window moves, the result carries the viewport's current `scroll_top` as the
    /// correction to re-apply after the new window renders.
    pub fn on_visibility(&mut self, sample: AnchorSample, now_ms: u64) -> RecomputeResult {
        let mut next = Arc::clone(&self.state);
        let mut correction = None;

        if let Some(scan) = self.rescan.rescan(
            &self.state,
            &self.sizes,
            sample.position,
            sample.viewport_height,
        ) {
            next = Arc::new(WindowState {
                range: scan.range,
                timestamp: now_ms,
                ..*self.state
            });
            correction = Some(sample.scroll_top);
        }

        let next = apply_filler_adjustments(&next, &mut self.sizes, self.reservations.get());
        self.commit(next, correction)
    }

    /// Runs a cycle for a viewport resize.
    ///
    /// Off-window measurements may be stale at the new width, so only the rendered window's
    /// measurements survive. A resize that keeps the height is ignored.
    pub fn on_viewport_resize(&mut self, viewport_height: f64) -> RecomputeResult {
        if viewport_height == self.viewport_height {
            return self.unchanged();
        }
        vdebug!(
            from = self.viewport_height,
            to = viewport_height,
            "on_viewport_resize"
        );
        self.viewport_height = viewport_height;
        self.sizes.reset(Some(self.state.range));

        let next = apply_filler_adjustments(&self.state, &mut self.sizes, self.reservations.get());
        self.commit(next, None)
    }

    /// Runs the per-render pass: reconcile fillers, grow the window if it does not fill the
    /// viewport, and reconcile fillers again if it grew.
    pub fn after_render(&mut self, viewport_height: f64, now_ms: u64) -> RecomputeResult {
        let reserved = self.reservations.get();
        let settled = apply_filler_adjustments(&self.state, &mut self.sizes, reserved);
        let grown = adjust_page_size(
            &settled,
            &mut self.sizes,
            viewport_height,
            self.rescan.threshold(),
            now_ms,
        );
        let next = if Arc::ptr_eq(&grown, &settled) {
            grown
        } else {
            apply_filler_adjustments(&grown, &mut self.sizes, reserved)
        };
        self.commit(next, None)
    }

    /// Runs filler reconciliation on its own.
    pub fn reconcile_fillers(&mut self) -> RecomputeResult {
        let next = apply_filler_adjustments(&self.state, &mut self.sizes, self.reservations.get());
        self.commit(next, None)
    }

    /// Applies a new total item count. An unchanged count is a no-op.
    pub fn set_count(&mut self, count: usize, now_ms: u64) -> RecomputeResult {
        if self.options.count == count {
            return self.unchanged();
        }
        self.options.count = count;
        self.reconcile_data(now_ms)
    }

    /// Applies a new data identity token. An unchanged token is a no-op.
    pub fn set_update_signal(&mut self, update_signal: u64, now_ms: u64) -> RecomputeResult {
        if self.options.update_signal == update_signal {
            return self.unchanged();
        }
        self.options.update_signal = update_signal;
        self.reconcile_data(now_ms)
    }

    /// Forces a data reconciliation with the current count.
    pub fn refresh(&mut self, now_ms: u64) -> RecomputeResult {
        self.reconcile_data(now_ms)
    }

    pub fn set_threshold(&mut self, threshold: f64) {
        self.options.threshold = threshold;
        self.rescan.set_threshold(self.options.effective_threshold());
    }

    pub fn set_on_range_changed(&mut self, f: Option<impl Fn(Range) + Send + Sync + 'static>) {
        self.options.on_range_changed = f.map(|f| Arc::new(f) as _);
    }

    /// Replaces the options.
    ///
    /// A changed `count` or `update_signal` runs a data reconciliation. Otherwise a larger
    /// `page_size` widens the window right away; a smaller one takes effect at the next data
    /// reconciliation, since the window never shrinks outside of it.
    pub fn set_options(&mut self, options: VScrollerOptions, now_ms: u64) -> RecomputeResult {
        let data_changed = options.count != self.options.count
            || options.update_signal != self.options.update_signal;
        self.options = options;
        self.rescan.set_threshold(self.options.effective_threshold());
        vtrace!(
            count = self.options.count,
            data_changed,
            "VScroller::set_options"
        );

        if data_changed {
            self.reconcile_data(now_ms)
        } else {
            self.widen_to_page_size(now_ms)
        }
    }

    /// Clones the current options, applies `f`, then delegates to `set_options`.
    pub fn update_options(
        &mut self,
        f: impl FnOnce(&mut VScrollerOptions),
        now_ms: u64,
    ) -> RecomputeResult {
        let mut next = self.options.clone();
        f(&mut next);
        self.set_options(next, now_ms)
    }

    fn reconcile_data(&mut self, now_ms: u64) -> RecomputeResult {
        let next = reconcile_data_change(
            &self.state,
            &mut self.sizes,
            self.options.count,
            self.options.effective_page_size(),
            now_ms,
        );
        let next = apply_filler_adjustments(&next, &mut self.sizes, self.reservations.get());
        self.commit(next, None)
    }

    fn widen_to_page_size(&mut self, now_ms: u64) -> RecomputeResult {
        let page_size = self.options.effective_page_size();
        if page_size <= self.state.size {
            return self.unchanged();
        }
        vdebug!(from = self.state.size, to = page_size, "page_size raised");
        let widened = Arc::new(WindowState {
            size: page_size,
            range: Range::new(self.state.range.start(), page_size, self.state.count),
            timestamp: now_ms,
            ..*self.state
        });
        let next = apply_filler_adjustments(&widened, &mut self.sizes, self.reservations.get());
        self.commit(next, None)
    }

    fn unchanged(&self) -> RecomputeResult {
        RecomputeResult {
            state: Arc::clone(&self.state),
            changed: false,
            scroll_correction: None,
        }
    }

    fn commit(&mut self, next: Arc<WindowState>, correction: Option<f64>) -> RecomputeResult {
        let changed = !Arc::ptr_eq(&next, &self.state);
        if changed {
            let prev = core::mem::replace(&mut self.state, Arc::clone(&next));
            if prev.range != next.range {
                vtrace!(
                    start = next.range.start(),
                    end = next.range.end(),
                    more = next.range.more(),
                    "range changed"
                );
                if let Some(cb) = &self.options.on_range_changed {
                    cb(next.range);
                }
            }
        }
        RecomputeResult {
            state: next,
            changed,
            scroll_correction: correction,
        }
    }
}
