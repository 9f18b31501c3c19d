use crate::{Range, SizeCache, WindowState};

/// Scroll direction inferred from anchor movement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollDirection {
    /// Content moved up on screen (the user scrolled towards later items).
    Down,
    /// Content moved down on screen (the user scrolled towards earlier items).
    Up,
}

/// What the host reads from the screen when a visibility event fires.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnchorSample {
    /// Screen-space y of the top sentinel relative to the viewport top.
    pub position: f64,
    /// Visible height of the viewport.
    pub viewport_height: f64,
    /// Current scroll offset of the viewport.
    pub scroll_top: f64,
}

/// A window placement produced by [`DirectionalRescan::rescan`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rescanned {
    pub range: Range,
    pub direction: ScrollDirection,
}

/// Recomputes the window from the top sentinel's movement.
///
/// The scan always walks forward from index 0, summing each row's measured height (or the
/// running average), until the accumulated height would pass a direction-specific target:
///
/// - down: `-position - threshold`, i.e. where the window's first row should sit so the
///   window is loaded `threshold` pixels before it scrolls into view;
/// - up: `-position + viewport_height + threshold`, where the window's last row should sit;
///   the window is then shifted back by its own size.
///
/// Boundary: a row that ends exactly on the target is consumed (the walk stops on `>`).
///
/// The rescan does not touch filler heights; run filler reconciliation after it.
#[derive(Clone, Debug)]
pub struct DirectionalRescan {
    last_position: f64,
    threshold: f64,
}

impl DirectionalRescan {
    pub fn new(position: f64, threshold: f64) -> Self {
        Self {
            last_position: position,
            threshold,
        }
    }

    /// Anchor position recorded by the last call.
    pub fn last_position(&self) -> f64 {
        self.last_position
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn set_threshold(&mut self, threshold: f64) {
        self.threshold = threshold;
    }

    /// Re-anchors without scanning (e.g. after the host re-mounted the sentinel).
    pub fn set_position(&mut self, position: f64) {
        self.last_position = position;
    }

    /// Computes the window for the sentinel at `position`.
    ///
    /// Returns `None` when the window stays as it is: the anchor did not move, the window is
    /// already at the end while scrolling down or at the start while scrolling up, or the scan
    /// lands on the current window.
    ///
    /// The placement is absolute, not relative to the current window. When rendered rows turn
    /// out taller than the estimate, a downward scan can land before the current start.
    ///
    /// The anchor is updated in every case, so the next call measures from here.
    pub fn rescan(
        &mut self,
        state: &WindowState,
        sizes: &SizeCache,
        position: f64,
        viewport_height: f64,
    ) -> Option<Rescanned> {
        let WindowState {
            range, size, count, ..
        } = *state;
        let last = core::mem::replace(&mut self.last_position, position);

        if position == last {
            return None;
        }
        let direction = if position < last {
            ScrollDirection::Down
        } else {
            ScrollDirection::Up
        };
        match direction {
            ScrollDirection::Down if range.end() == count => return None,
            ScrollDirection::Up if range.start() == 0 => return None,
            _ => {}
        }

        let (target, limit) = match direction {
            ScrollDirection::Down => (-position - self.threshold, count.saturating_sub(size)),
            ScrollDirection::Up => (-position + viewport_height + self.threshold, count),
        };
        let cursor = scan_to(sizes, target, limit);

        let start = match direction {
            ScrollDirection::Down => cursor,
            ScrollDirection::Up => cursor.saturating_sub(size),
        };
        let next = Range::new(start, size, count);

        vtrace!(
            ?direction,
            position,
            last,
            target,
            cursor,
            start,
            "rescan"
        );

        (next != range).then_some(Rescanned {
            range: next,
            direction,
        })
    }
}

/// Walks rows from index 0 and returns the first index whose row would push the accumulated
/// height past `target`, or `limit` if the walk gets there first.
pub fn scan_to(sizes: &SizeCache, target: f64, limit: usize) -> usize {
    let avg = sizes.average();
    let mut top = 0.0;
    let mut index = 0usize;

    while index < limit {
        let h = sizes.get(index);
        let row = if h > 0.0 { h } else { avg };
        if top + row > target {
            break;
        }
        top += row;
        index += 1;
    }
    index
}
