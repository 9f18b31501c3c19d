use alloc::sync::Arc;
use core::sync::atomic::{AtomicU64, Ordering};

use crate::Range;

/// Pixel heights reserved for a header above and a footer below the item window.
///
/// Headers and footers are not part of the virtualized range, so their heights are added to
/// the top/bottom fillers whenever they are scrolled out of the window.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OffsetReservation {
    pub header: f64,
    pub footer: f64,
}

/// `f64` bit patterns; all-zero bits is `0.0`.
#[derive(Debug, Default)]
struct Cells {
    header: AtomicU64,
    footer: AtomicU64,
}

/// Shared side-channel for header/footer heights.
///
/// Header/footer collaborators write to it directly. A write never triggers a recompute; the
/// value is only read by the next filler reconciliation. Clones share the same storage and may
/// live on other threads.
#[derive(Clone, Debug, Default)]
pub struct Reservations {
    cells: Arc<Cells>,
}

impl Reservations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> OffsetReservation {
        OffsetReservation {
            header: f64::from_bits(self.cells.header.load(Ordering::Relaxed)),
            footer: f64::from_bits(self.cells.footer.load(Ordering::Relaxed)),
        }
    }

    pub fn report_header(&self, height: f64) {
        let Some(height) = sanitize(height) else {
            vwarn!(height, "Reservations::report_header: ignoring invalid height");
            return;
        };
        self.cells.header.store(height.to_bits(), Ordering::Relaxed);
    }

    pub fn report_footer(&self, height: f64) {
        let Some(height) = sanitize(height) else {
            vwarn!(height, "Reservations::report_footer: ignoring invalid height");
            return;
        };
        self.cells.footer.store(height.to_bits(), Ordering::Relaxed);
    }
}

fn sanitize(height: f64) -> Option<f64> {
    (height.is_finite() && height >= 0.0).then_some(height)
}

/// Render policy and measurement sink for a list header.
#[derive(Clone, Debug)]
pub struct HeaderSlot {
    reservations: Reservations,
    sticky: bool,
}

impl HeaderSlot {
    /// A sticky header is always on screen, so it never reserves filler space.
    pub fn new(reservations: Reservations, sticky: bool) -> Self {
        Self {
            reservations,
            sticky,
        }
    }

    pub fn is_sticky(&self) -> bool {
        self.sticky
    }

    /// A non-sticky header is only rendered while the window starts at the first item.
    pub fn is_rendered(&self, range: Range) -> bool {
        self.sticky || range.start() == 0
    }

    /// Feeds the header's rendered height into the side-channel.
    pub fn on_resize(&self, height: f64) {
        if self.sticky {
            return;
        }
        self.reservations.report_header(height);
    }
}

/// Render policy and measurement sink for a list footer.
#[derive(Clone, Debug)]
pub struct FooterSlot {
    reservations: Reservations,
    fixed_height: Option<f64>,
    measured: bool,
}

impl FooterSlot {
    /// Creates a footer slot. A known `fixed_height` is reserved immediately.
    pub fn new(reservations: Reservations, fixed_height: Option<f64>) -> Self {
        if let Some(h) = fixed_height {
            reservations.report_footer(h);
        }
        Self {
            reservations,
            fixed_height,
            measured: false,
        }
    }

    pub fn is_measured(&self) -> bool {
        self.fixed_height.is_some() || self.measured
    }

    /// Whether the footer should be rendered for `range`.
    ///
    /// An unmeasured footer renders once (off screen, since more items follow) so it can be
    /// measured; after that it is hidden until the window reaches the end of the list.
    pub fn is_rendered(&self, range: Range) -> bool {
        if self.fixed_height.is_some() {
            return true;
        }
        !(range.more() && self.measured)
    }

    /// Feeds the footer's rendered height into the side-channel.
    pub fn on_resize(&mut self, height: f64) {
        if self.fixed_height.is_some() {
            return;
        }
        self.reservations.report_footer(height);
        self.measured = true;
    }
}
