use alloc::vec::Vec;
use core::cell::Cell;

use crate::Range;

/// Filler heights derived from the cache for a given window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FillerHeights {
    /// Estimated pixel height of everything before the window.
    pub top: u64,
    /// Estimated pixel height of everything after the window.
    pub bottom: u64,
}

/// Per-index height storage with a running average of the known heights.
///
/// Storage is dense: one slot per item index plus a `known` flag, so an unknown height is
/// explicit rather than a hole. Heights are pixels as reported by the measurement hook.
///
/// The average is computed lazily from scratch and cached until the next `set`/`reset`/`resize`.
/// Zero heights are excluded from it, so collapsed placeholder rows do not drag the estimate
/// for regular rows towards zero.
#[derive(Clone, Debug, Default)]
pub struct SizeCache {
    heights: Vec<f64>,
    known: Vec<bool>,
    average: Cell<Option<f64>>,
}

impl SizeCache {
    /// Creates a cache sized for `len` items, with every height unknown.
    pub fn new(len: usize) -> Self {
        Self {
            heights: alloc::vec![0.0; len],
            known: alloc::vec![false; len],
            average: Cell::new(None),
        }
    }

    /// Current capacity (tracks the total item count).
    pub fn len(&self) -> usize {
        self.heights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    /// Returns the known height at `index`, or `0.0` when unknown or out of bounds.
    pub fn get(&self, index: usize) -> f64 {
        match self.known.get(index) {
            Some(true) => self.heights[index],
            _ => 0.0,
        }
    }

    pub fn is_known(&self, index: usize) -> bool {
        self.known.get(index).copied().unwrap_or(false)
    }

    /// Number of indexes holding a measurement.
    pub fn known_len(&self) -> usize {
        self.known.iter().filter(|&&k| k).count()
    }

    /// Records a measured height, growing capacity if `index` is past the end.
    ///
    /// Negative or non-finite values are ignored.
    pub fn set(&mut self, index: usize, height: f64) {
        if !height.is_finite() || height < 0.0 {
            vwarn!(index, height, "SizeCache::set: ignoring invalid height");
            return;
        }
        if index >= self.heights.len() {
            self.grow_to(index + 1);
        }
        self.heights[index] = height;
        self.known[index] = true;
        self.average.set(None);
    }

    /// Mean of all known non-zero heights; `0.0` when nothing usable is known.
    pub fn average(&self) -> f64 {
        if let Some(avg) = self.average.get() {
            return avg;
        }

        let mut sum = 0.0;
        let mut n = 0usize;
        for (&h, &known) in self.heights.iter().zip(&self.known) {
            if known && h > 0.0 {
                sum += h;
                n += 1;
            }
        }

        let avg = if n == 0 { 0.0 } else { sum / n as f64 };
        self.average.set(Some(avg));
        avg
    }

    /// The height used for layout math at `index`: the measurement if it is non-zero,
    /// otherwise the running average.
    pub fn estimate(&self, index: usize) -> f64 {
        let h = self.get(index);
        if h > 0.0 { h } else { self.average() }
    }

    /// Sum of estimated heights over `[start, end)`, rounded up to a whole pixel.
    ///
    /// Grows capacity when `end` is past the current length.
    pub fn range_height(&mut self, start: usize, end: usize) -> u64 {
        if end > self.heights.len() {
            self.grow_to(end);
        }
        if start >= end {
            return 0;
        }

        let avg = self.average();
        let mut height = 0.0;
        for i in start..end {
            let h = self.get(i);
            height += if h > 0.0 { h } else { avg };
        }
        ceil_px(height)
    }

    /// Height of the items inside `range`.
    pub fn window_height(&mut self, range: Range) -> u64 {
        self.range_height(range.start(), range.end())
    }

    /// Filler heights needed so off-window content keeps its estimated share of scroll space.
    pub fn offsets(&mut self, range: Range) -> FillerHeights {
        let top = self.range_height(0, range.start());
        let len = self.heights.len();
        let bottom = self.range_height(range.end(), len);
        FillerHeights { top, bottom }
    }

    /// Clears every measurement outside `keep` (or all of them when `keep` is `None`).
    ///
    /// Capacity is unchanged.
    pub fn reset(&mut self, keep: Option<Range>) {
        for (i, (h, known)) in self.heights.iter_mut().zip(self.known.iter_mut()).enumerate() {
            if keep.is_some_and(|r| r.contains(i)) {
                continue;
            }
            *h = 0.0;
            *known = false;
        }
        self.average.set(None);
    }

    /// Changes capacity to `len` and clears every measurement.
    pub fn resize(&mut self, len: usize) {
        if self.heights.len() != len {
            vdebug!(from = self.heights.len(), to = len, "SizeCache::resize");
            self.heights.resize(len, 0.0);
            self.known.resize(len, false);
        }
        self.reset(None);
    }

    fn grow_to(&mut self, len: usize) {
        self.heights.resize(len, 0.0);
        self.known.resize(len, false);
    }
}

/// Rounds a non-negative pixel amount up to a whole pixel.
///
/// `core` has no `f64::ceil`, and the values here are always finite and non-negative.
pub(crate) fn ceil_px(value: f64) -> u64 {
    if value.is_nan() || value <= 0.0 {
        return 0;
    }
    let whole = value as u64;
    if (whole as f64) < value {
        whole.saturating_add(1)
    } else {
        whole
    }
}
