use alloc::boxed::Box;

use crate::{ElementHandle, Subscription};

/// The elements the controller watches for visibility.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Sentinel {
    /// Top filler of the window.
    Top,
    /// Bottom filler of the window.
    Bottom,
    /// The rendered window itself.
    Body,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntersectionEntry {
    pub sentinel: Sentinel,
    pub is_intersecting: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WatchOptions {
    /// `None` watches against the whole window.
    pub root: Option<ElementHandle>,
    /// Vertical margin added to the root before intersection is tested.
    pub margin_px: f64,
}

pub type IntersectionCallback = Box<dyn FnMut(&[IntersectionEntry])>;

/// An intersection-observer style service.
pub trait VisibilityWatcher {
    /// Watches `targets`, calling back with the entries whose intersection state changed.
    fn observe(
        &mut self,
        targets: &[Sentinel],
        options: WatchOptions,
        callback: IntersectionCallback,
    ) -> Subscription;
}

/// Reports an element's rendered height whenever it changes.
pub trait MeasurementReporter {
    fn observe_height(&mut self, callback: Box<dyn FnMut(f64)>) -> Subscription;
}

/// Reads the top sentinel's current screen position, relative to the viewport top.
pub trait SentinelProbe {
    fn top_position(&self) -> f64;
}

impl<F: Fn() -> f64> SentinelProbe for F {
    fn top_position(&self) -> f64 {
        self()
    }
}
