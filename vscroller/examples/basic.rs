// Example: minimal usage with uniform rows.
use vscroller::{AnchorSample, VScroller, VScrollerOptions};

fn main() {
    let mut v = VScroller::new(
        VScrollerOptions::new(1_000_000).with_page_size(20),
        0.0,
        600.0,
        0,
    );

    // The host renders the first window and reports row heights.
    for i in v.state().indices() {
        v.measure(i, 24.0);
    }
    let out = v.after_render(600.0, 16);
    println!("initial={:?} grew={}", out.state.range, out.changed);
    println!("top={} bottom={}", out.state.top, out.state.bottom);

    // The bottom sentinel became visible after a 50k px scroll.
    let sample = AnchorSample {
        position: -50_000.0,
        viewport_height: 600.0,
        scroll_top: 50_000.0,
    };
    let out = v.on_visibility(sample, 32);
    println!("after scroll: range={:?}", out.state.range);
    println!("re-pin scroll_top to {:?} after render", out.scroll_correction);
}
