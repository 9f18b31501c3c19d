use alloc::sync::Arc;

use crate::Range;

/// Default number of items rendered at once.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Default pre-fetch margin in pixels.
pub const DEFAULT_THRESHOLD: f64 = 300.0;

/// A callback fired when a recompute cycle produces a window with different bounds.
pub type OnRangeChangedCallback = Arc<dyn Fn(Range) + Send + Sync>;

/// Configuration for [`crate::VScroller`].
///
/// Cheap to clone: the callback is held in an `Arc`, so hosts can tweak a field and call
/// `VScroller::set_options` without reallocating closures.
pub struct VScrollerOptions {
    /// Total number of logical items.
    pub count: usize,
    /// Initial (and minimum) window size. Grows automatically when the rendered rows do not
    /// fill the viewport.
    pub page_size: usize,
    /// Pixel margin used to pre-trigger rescans and to size the auto-grow target.
    pub threshold: f64,
    /// Optional callback fired when the rendered range changes.
    pub on_range_changed: Option<OnRangeChangedCallback>,
    /// Opaque token identifying the backing data. Changing it forces a data reconciliation
    /// even when `count` stays the same (e.g. a re-sorted collection).
    pub update_signal: u64,
}

impl Clone for VScrollerOptions {
    fn clone(&self) -> Self {
        Self {
            count: self.count,
            page_size: self.page_size,
            threshold: self.threshold,
            on_range_changed: self.on_range_changed.clone(),
            update_signal: self.update_signal,
        }
    }
}

impl VScrollerOptions {
    /// Creates options for `count` items with the default page size and threshold.
    pub fn new(count: usize) -> Self {
        Self {
            count,
            page_size: DEFAULT_PAGE_SIZE,
            threshold: DEFAULT_THRESHOLD,
            on_range_changed: None,
            update_signal: 0,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_on_range_changed(
        mut self,
        on_range_changed: Option<impl Fn(Range) + Send + Sync + 'static>,
    ) -> Self {
        self.on_range_changed = on_range_changed.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_update_signal(mut self, update_signal: u64) -> Self {
        self.update_signal = update_signal;
        self
    }

    /// Page size with degenerate values clamped (`0` becomes `1`).
    pub(crate) fn effective_page_size(&self) -> usize {
        if self.page_size == 0 {
            vwarn!("VScrollerOptions: page_size 0 clamped to 1");
            return 1;
        }
        self.page_size
    }

    /// Threshold with negative or non-finite values clamped to `0`.
    pub(crate) fn effective_threshold(&self) -> f64 {
        if self.threshold.is_finite() && self.threshold >= 0.0 {
            return self.threshold;
        }
        vwarn!(
            threshold = self.threshold,
            "VScrollerOptions: invalid threshold clamped to 0"
        );
        0.0
    }
}

impl Default for VScrollerOptions {
    fn default() -> Self {
        Self::new(0)
    }
}

impl core::fmt::Debug for VScrollerOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("VScrollerOptions")
            .field("count", &self.count)
            .field("page_size", &self.page_size)
            .field("threshold", &self.threshold)
            .field("update_signal", &self.update_signal)
            .finish_non_exhaustive()
    }
}
