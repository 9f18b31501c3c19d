use alloc::boxed::Box;

use crate::{ScrollNode, ScrollParent, Subscription, find_scroll_parent};

/// Opaque identifier of a host element (the scroll container used as a visibility root).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElementHandle(pub u64);

/// A resize listener registered with a viewport.
pub type ResizeCallback = Box<dyn FnMut()>;

/// The scrolling region the list lives in.
pub trait Viewport {
    /// Visible height in pixels.
    fn height(&self) -> f64;
    fn scroll_top(&self) -> f64;
    fn set_scroll_top(&mut self, value: f64);
    /// Root to scope visibility watches to. `None` means the whole window.
    fn root(&self) -> Option<ElementHandle>;
    fn on_resize(&mut self, callback: ResizeCallback) -> Subscription;
}

/// Host bindings for the top-level window.
pub trait WindowHost {
    fn inner_height(&self) -> f64;
    fn scroll_top(&self) -> f64;
    fn set_scroll_top(&mut self, value: f64);
    fn on_resize(&mut self, callback: ResizeCallback) -> Subscription;
}

/// Host bindings for a scrollable element.
pub trait ScrollContainer {
    fn handle(&self) -> ElementHandle;
    fn offset_height(&self) -> f64;
    fn scroll_top(&self) -> f64;
    fn set_scroll_top(&mut self, value: f64);
    fn on_resize(&mut self, callback: ResizeCallback) -> Subscription;
}

/// Viewport variant for lists scrolled by the window.
#[derive(Clone, Debug)]
pub struct WindowViewport<W> {
    host: W,
}

impl<W: WindowHost> WindowViewport<W> {
    pub fn new(host: W) -> Self {
        Self { host }
    }

    pub fn host(&self) -> &W {
        &self.host
    }
}

impl<W: WindowHost> Viewport for WindowViewport<W> {
    fn height(&self) -> f64 {
        self.host.inner_height()
    }

    fn scroll_top(&self) -> f64 {
        self.host.scroll_top()
    }

    fn set_scroll_top(&mut self, value: f64) {
        self.host.set_scroll_top(value);
    }

    fn root(&self) -> Option<ElementHandle> {
        None
    }

    fn on_resize(&mut self, callback: ResizeCallback) -> Subscription {
        self.host.on_resize(callback)
    }
}

/// Viewport variant for lists inside a scrollable element.
#[derive(Clone, Debug)]
pub struct ContainerViewport<C> {
    container: C,
}

impl<C: ScrollContainer> ContainerViewport<C> {
    pub fn new(container: C) -> Self {
        Self { container }
    }

    pub fn container(&self) -> &C {
        &self.container
    }
}

impl<C: ScrollContainer> Viewport for ContainerViewport<C> {
    fn height(&self) -> f64 {
        self.container.offset_height()
    }

    fn scroll_top(&self) -> f64 {
        self.container.scroll_top()
    }

    fn set_scroll_top(&mut self, value: f64) {
        self.container.set_scroll_top(value);
    }

    fn root(&self) -> Option<ElementHandle> {
        Some(self.container.handle())
    }

    fn on_resize(&mut self, callback: ResizeCallback) -> Subscription {
        self.container.on_resize(callback)
    }
}

/// Picks the viewport variant for the list mounted at `node`.
///
/// Runs once at construction; the returned trait object is used from then on.
/// `bind_container` turns the resolved scroll parent into host bindings.
pub fn select_viewport<N, W, C>(
    node: &N,
    window: W,
    bind_container: impl FnOnce(N) -> C,
) -> Box<dyn Viewport>
where
    N: ScrollNode,
    W: WindowHost + 'static,
    C: ScrollContainer + 'static,
{
    match find_scroll_parent(node) {
        ScrollParent::Window => {
            vdebug!("select_viewport: window");
            Box::new(WindowViewport::new(window))
        }
        ScrollParent::Container(parent) => {
            let container = bind_container(parent);
            vdebug!(root = container.handle().0, "select_viewport: container");
            Box::new(ContainerViewport::new(container))
        }
    }
}
