use crate::Range;

/// A snapshot of the rendered window.
///
/// Snapshots are handed out as `Arc<WindowState>` and never mutated: a recompute cycle either
/// returns the very same `Arc` (nothing changed) or a new one. Consumers that memoize on
/// identity can use `Arc::ptr_eq` as a cheap "did anything change" check.
///
/// The size cache and the header/footer reservations are not part of the snapshot; they are
/// owned by [`crate::VScroller`] and survive every replacement.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowState {
    /// Currently rendered window.
    pub range: Range,
    /// Window length. Differs from `range.len()` when the window is clipped by `count`.
    pub size: usize,
    /// Total logical item count.
    pub count: usize,
    /// Filler height above the window, in pixels.
    pub top: f64,
    /// Filler height below the window, in pixels.
    pub bottom: f64,
    /// Bumped whenever the backing data is reconciled.
    pub version: u64,
    /// Caller-supplied time (ms) of the last structural window change.
    pub timestamp: u64,
}

impl WindowState {
    /// The state at mount: a window of `page_size` items from index 0, no fillers yet.
    pub fn initial(page_size: usize, count: usize, now_ms: u64) -> Self {
        Self {
            range: Range::new(0, page_size, count),
            size: page_size,
            count,
            top: 0.0,
            bottom: 0.0,
            version: 0,
            timestamp: now_ms,
        }
    }

    /// Indexes to render, in order.
    pub fn indices(&self) -> core::ops::Range<usize> {
        self.range.iter()
    }

    /// Total scrollable height implied by this snapshot, given the window's rendered height.
    pub fn scroll_height(&self, window_height: f64) -> f64 {
        self.top + window_height + self.bottom
    }

    /// Whether `other` should be treated as a different window by memoized renderers.
    ///
    /// Numeric bounds alone are not enough: a data reconciliation keeps the same bounds but
    /// the rows behind them changed, which is what `version`/`timestamp` capture.
    pub fn is_new_window(&self, other: &Self) -> bool {
        self.range != other.range
            || self.version != other.version
            || self.timestamp != other.timestamp
    }
}
