//! A headless windowing engine for virtualized lists and tables.
//!
//! For adapter-level plumbing (viewports, visibility watchers, event queue, scroll-settle
//! detection), see the `vscroller-adapter` crate.
//!
//! Given a very large item count, the engine decides which contiguous window of items to
//! materialize as the user scrolls, resizes, or the data changes, and how tall the fillers
//! above and below that window must be so the scrollbar behaves as if every item were present.
//! Item heights are discovered lazily: unknown heights are estimated from a running average of
//! the measured ones, so geometry is "close enough" at first and self-corrects.
//!
//! It is UI-agnostic. A host is expected to provide:
//! - the top sentinel's screen position when a visibility watcher fires
//! - the viewport height and scroll offset
//! - measured item (and header/footer) heights
//!
//! ```
//! use vscroller::{AnchorSample, VScroller, VScrollerOptions};
//!
//! let mut v = VScroller::new(VScrollerOptions::new(1_000).with_page_size(10), 0.0, 400.0, 0);
//! for i in 0..10 {
//!     v.measure(i, 50.0);
//! }
//! let _ = v.after_render(400.0, 1);
//!
//! // The top sentinel moved 2000px up: the user scrolled down.
//! let sample = AnchorSample { position: -2000.0, viewport_height: 400.0, scroll_top: 2000.0 };
//! let out = v.on_visibility(sample, 2);
//! assert!(out.state.range.start() > 0);
//! assert_eq!(out.scroll_correction, Some(2000.0));
//! ```
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod data_change;
mod fillers;
mod grow;
mod options;
mod range;
mod rescan;
mod reservations;
mod size_cache;
mod state;
mod vscroller;


pub use data_change::reconcile_data_change;
pub use fillers::apply_filler_adjustments;
pub use grow::adjust_page_size;
pub use options::{DEFAULT_PAGE_SIZE, DEFAULT_THRESHOLD, OnRangeChangedCallback, VScrollerOptions};
pub use range::Range;
pub use rescan::{AnchorSample, DirectionalRescan, Rescanned, ScrollDirection, scan_to};
pub use reservations::{FooterSlot, HeaderSlot, OffsetReservation, Reservations};
pub use size_cache::{FillerHeights, SizeCache};
pub use state::WindowState;
pub use vscroller::{RecomputeResult, VScroller};
