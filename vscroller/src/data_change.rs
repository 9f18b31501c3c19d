use alloc::sync::Arc;

use crate::{Range, SizeCache, WindowState};

/// Reconciles the window after the backing data changed.
///
/// Old indexes no longer name the same rows, so every cached measurement is dropped (this is
/// the only path that does that). The start is clamped so a full window still fits, and
/// `version` is bumped so memoized renderers remount even if the bounds are unchanged.
///
/// `min_size` is the configured page size; the window never drops below it. Filler
/// reconciliation is left to the caller.
pub fn reconcile_data_change(
    state: &WindowState,
    sizes: &mut SizeCache,
    count: usize,
    min_size: usize,
    now_ms: u64,
) -> Arc<WindowState> {
    sizes.resize(count);

    let size = state.size.max(min_size);
    let start = state.range.start().min(count.saturating_sub(size));
    vdebug!(
        prev_count = state.count,
        count,
        start,
        size,
        version = state.version.wrapping_add(1),
        "reconcile_data_change"
    );

    Arc::new(WindowState {
        range: Range::new(start, size, count),
        size,
        count,
        version: state.version.wrapping_add(1),
        timestamp: now_ms,
        ..*state
    })
}
