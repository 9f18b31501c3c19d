use std::cell::{Cell, RefCell};
use std::rc::Rc;

use vscroller::VScrollerOptions;
use vscroller_adapter::{
    Controller, ElementHandle, IntersectionCallback, IntersectionEntry, ResizeCallback, Sentinel,
    Subscription, Viewport, VisibilityWatcher, WatchOptions,
};

const ROW: f64 = 30.0;

/// A scroll container that only records its offset.
#[derive(Clone, Default)]
struct HostViewport {
    scroll_top: Rc<Cell<f64>>,
}

impl Viewport for HostViewport {
    fn height(&self) -> f64 {
        600.0
    }

    fn scroll_top(&self) -> f64 {
        self.scroll_top.get()
    }

    fn set_scroll_top(&mut self, value: f64) {
        self.scroll_top.set(value);
    }

    fn root(&self) -> Option<ElementHandle> {
        Some(ElementHandle(1))
    }

    fn on_resize(&mut self, _callback: ResizeCallback) -> Subscription {
        Subscription::empty()
    }
}

/// Keeps the sentinel callback so the loop below can fire it.
#[derive(Clone, Default)]
struct HostWatcher {
    sentinels: Rc<RefCell<Option<IntersectionCallback>>>,
}

impl VisibilityWatcher for HostWatcher {
    fn observe(
        &mut self,
        targets: &[Sentinel],
        options: WatchOptions,
        callback: IntersectionCallback,
    ) -> Subscription {
        println!("observe {targets:?} margin={}", options.margin_px);
        if targets.contains(&Sentinel::Top) {
            *self.sentinels.borrow_mut() = Some(callback);
        }
        Subscription::empty()
    }
}

fn main() {
    // Example: an adapter loop driving the controller without any UI toolkit.
    //
    // A real adapter would:
    // - forward intersection/resize/measurement callbacks (they only enqueue)
    // - call process(now_ms) once per task, on_frame(now_ms) once per animation frame
    // - render the returned window, then call after_render(now_ms)
    let viewport = HostViewport::default();
    let top = Rc::new(Cell::new(0.0));
    let probe = {
        let top = Rc::clone(&top);
        move || top.get()
    };

    let mut c = Controller::new(
        VScrollerOptions::new(100_000).with_page_size(20),
        Box::new(viewport.clone()),
        Box::new(probe),
        0,
    );
    let mut watcher = HostWatcher::default();
    c.connect(&mut watcher);

    let mut now_ms = 0;
    for offset in [0.0, 900.0, 2_400.0, 2_400.0, 9_000.0] {
        now_ms += 16;
        viewport.scroll_top.set(offset);
        top.set(-offset);

        if let Some(cb) = watcher.sentinels.borrow_mut().as_mut() {
            cb(&[IntersectionEntry {
                sentinel: Sentinel::Bottom,
                is_intersecting: true,
            }]);
        }
        let changed = c.process(now_ms);

        // "Render": measure the window's rows.
        for i in c.state().indices() {
            c.measure(i, ROW);
        }
        let _ = c.after_render(now_ms);

        let s = c.state();
        println!(
            "offset={offset} changed={} range={}..{} top={} bottom={} scroll_top={}",
            changed.is_some(),
            s.range.start(),
            s.range.end(),
            s.top,
            s.bottom,
            viewport.scroll_top.get(),
        );
    }

    c.teardown();
    println!("torn down: {}", c.is_torn_down());
}
