//! Adapter plumbing for the `vscroller` crate.
//!
//! The `vscroller` crate is UI-agnostic and only does the window math. This crate provides the
//! framework-neutral pieces an adapter needs around it:
//!
//! - a `Viewport` capability with window and scroll-container variants, picked once from the
//!   nearest scrollable ancestor
//! - visibility-watcher and measurement-reporter contracts with `Subscription` teardown handles
//! - a frame-polled "wait for scroll to stop" detector with cancellation tokens
//! - an event queue feeding a single-threaded `Controller`
//!
//! This crate is intentionally framework-agnostic (no DOM/egui/ratatui bindings).
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod controller;
mod queue;
mod scroll_parent;
mod settle;
mod subscription;
mod viewport;
mod watcher;

#[cfg(test)]
mod tests;

pub use controller::Controller;
pub use queue::{Event, EventQueue, EventSender};
pub use scroll_parent::{Overflow, Position, ScrollNode, ScrollParent, find_scroll_parent};
pub use settle::{ScrollSettle, SettleStatus};
pub use subscription::{CancelToken, Subscription};
pub use viewport::{
    ContainerViewport, ElementHandle, ResizeCallback, ScrollContainer, Viewport, WindowHost,
    WindowViewport, select_viewport,
};
pub use watcher::{
    IntersectionCallback, IntersectionEntry, MeasurementReporter, Sentinel, SentinelProbe,
    VisibilityWatcher, WatchOptions,
};
