// Example: variable row heights, header/footer reservations and a data change.
use vscroller::{AnchorSample, VScroller, VScrollerOptions};

fn row_height(i: usize) -> f64 {
    // Every fifth row wraps onto a second line.
    if i % 5 == 0 { 48.0 } else { 24.0 }
}

fn render(v: &mut VScroller, now_ms: u64) {
    for i in v.state().indices() {
        v.measure(i, row_height(i));
    }
    let out = v.after_render(v.viewport_height(), now_ms);
    let s = &out.state;
    println!(
        "t={now_ms} range={}..{} more={} size={} top={} bottom={} avg={:.1}",
        s.range.start(),
        s.range.end(),
        s.range.more(),
        s.size,
        s.top,
        s.bottom,
        v.sizes().average(),
    );
}

fn main() {
    let opts = VScrollerOptions::new(5_000)
        .with_page_size(10)
        .with_threshold(200.0)
        .with_on_range_changed(Some(|r: vscroller::Range| {
            println!("  on_range_changed: {}..{}", r.start(), r.end());
        }));
    let mut v = VScroller::new(opts, 0.0, 480.0, 0);

    let header = v.header_slot(false);
    let footer = v.footer_slot(Some(32.0));
    header.on_resize(64.0);

    render(&mut v, 0);
    render(&mut v, 16);

    let mut now_ms = 32;
    for offset in [1_000.0, 4_000.0, 12_000.0] {
        let sample = AnchorSample {
            position: -offset,
            viewport_height: 480.0,
            scroll_top: offset,
        };
        let out = v.on_visibility(sample, now_ms);
        println!(
            "scrolled to {offset}: correction={:?} header_rendered={} footer_rendered={}",
            out.scroll_correction,
            header.is_rendered(out.state.range),
            footer.is_rendered(out.state.range),
        );
        render(&mut v, now_ms + 8);
        now_ms += 16;
    }

    // New data: the cache is cleared and the window clamped into the new count.
    let out = v.set_count(300, now_ms);
    println!(
        "count=300: range={:?} version={} known={}",
        out.state.range,
        out.state.version,
        v.sizes().known_len()
    );
    render(&mut v, now_ms + 8);
}
