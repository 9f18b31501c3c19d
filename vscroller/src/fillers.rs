use alloc::sync::Arc;

use crate::{OffsetReservation, SizeCache, WindowState};

/// Recomputes the top/bottom filler heights for `state`.
///
/// The header reservation is added while the window starts past the first item and the footer
/// reservation while more items follow, since neither is rendered inside the window then.
///
/// Returns `state` itself (same `Arc`) when both fillers are unchanged.
pub fn apply_filler_adjustments(
    state: &Arc<WindowState>,
    sizes: &mut SizeCache,
    reserved: OffsetReservation,
) -> Arc<WindowState> {
    let range = state.range;
    debug_assert!(
        sizes.len() == state.count,
        "size cache out of sync with count (len={}, count={})",
        sizes.len(),
        state.count
    );

    let mut top = sizes.range_height(0, range.start()) as f64;
    let mut bottom = sizes.range_height(range.end(), state.count) as f64;

    if range.start() > 0 {
        top += reserved.header;
    }
    if range.more() {
        bottom += reserved.footer;
    }

    if top == state.top && bottom == state.bottom {
        return Arc::clone(state);
    }

    vtrace!(top, bottom, start = range.start(), end = range.end(), "fillers");
    Arc::new(WindowState {
        top,
        bottom,
        ..**state
    })
}
