use alloc::sync::Arc;

use crate::size_cache::ceil_px;
use crate::{Range, SizeCache, WindowState};

/// Grows the window until its rendered height covers the viewport plus `threshold` on both
/// sides.
///
/// If the window is shorter than that, both sentinels can be on screen at once and no further
/// visibility events would fire. The new size is extrapolated from the average height of the
/// rows currently in the window.
///
/// Returns `state` itself when no growth is needed: the list already renders everything,
/// nothing in the window has a height yet, or the window already covers the target. The window
/// never shrinks here, so repeated calls converge.
pub fn adjust_page_size(
    state: &Arc<WindowState>,
    sizes: &mut SizeCache,
    viewport_height: f64,
    threshold: f64,
    now_ms: u64,
) -> Arc<WindowState> {
    let WindowState {
        size, range, count, ..
    } = **state;

    if count <= size {
        return Arc::clone(state);
    }

    let rendered = sizes.window_height(range) as f64;
    let target = viewport_height + threshold * 2.0;
    let rendered_count = range.len();

    if rendered <= 0.0 || rendered >= target || rendered_count == 0 {
        return Arc::clone(state);
    }

    let per_item = rendered / rendered_count as f64;
    let wanted = ceil_px(target / per_item);
    let next = usize::try_from(wanted).unwrap_or(usize::MAX).min(count);
    if next <= size {
        return Arc::clone(state);
    }

    vdebug!(from = size, to = next, rendered, target, "adjust_page_size");
    Arc::new(WindowState {
        size: next,
        range: Range::new(range.start(), next, count),
        timestamp: now_ms,
        ..**state
    })
}
