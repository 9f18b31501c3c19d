/// The contiguous `[start, end)` slice of item indexes currently materialized.
///
/// A `Range` is an immutable value: recompute cycles replace it wholesale. The constructor
/// upholds `start <= end <= count` and `more == (end < count)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawRange"))]
pub struct Range {
    start: usize,
    end: usize, // exclusive
    more: bool,
}

impl Range {
    /// The empty range used when there is nothing to render.
    pub const EMPTY: Self = Self {
        start: 0,
        end: 0,
        more: false,
    };

    /// Builds a window of (at most) `size` items starting at `start` out of `count`.
    ///
    /// `start` is clamped to `count`, so the result is always a valid window.
    pub fn new(start: usize, size: usize, count: usize) -> Self {
        let start = start.min(count);
        let end = start.saturating_add(size).min(count);
        Self {
            start,
            end,
            more: end < count,
        }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// Whether items exist after `end`.
    pub fn more(&self) -> bool {
        self.more
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && index < self.end
    }

    /// Iterates the rendered indexes in ascending order.
    pub fn iter(&self) -> core::ops::Range<usize> {
        self.start..self.end
    }
}

impl IntoIterator for Range {
    type Item = usize;
    type IntoIter = core::ops::Range<usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Unvalidated wire form of [`Range`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawRange {
    start: usize,
    end: usize,
    more: bool,
}

#[cfg(feature = "serde")]
impl TryFrom<RawRange> for Range {
    type Error = &'static str;

    fn try_from(raw: RawRange) -> Result<Self, Self::Error> {
        if raw.start > raw.end {
            return Err("range start is past its end");
        }
        Ok(Self {
            start: raw.start,
            end: raw.end,
            more: raw.more,
        })
    }
}
