use alloc::collections::VecDeque;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use crate::IntersectionEntry;

/// A host notification waiting to be reconciled.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    Intersections(Vec<IntersectionEntry>),
    /// The viewport reported a resize; its height is read when the event is processed.
    Resized,
    Measured { index: usize, height: f64 },
    CountChanged(usize),
    UpdateSignal(u64),
    Refresh,
}

#[derive(Debug, Default)]
struct Shared {
    events: VecDeque<Event>,
    closed: bool,
}

/// Single-threaded FIFO between host callbacks and the reconciler.
///
/// Callbacks hold an [`EventSender`] and only enqueue; the reconciler drains with `pop`. A
/// borrow is never held across a pop, so callbacks fired while an event is being handled can
/// still enqueue.
#[derive(Debug, Default)]
pub struct EventQueue {
    shared: Rc<RefCell<Shared>>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sender(&self) -> EventSender {
        EventSender {
            shared: Rc::clone(&self.shared),
        }
    }

    pub fn pop(&self) -> Option<Event> {
        self.shared.borrow_mut().events.pop_front()
    }

    pub fn len(&self) -> usize {
        self.shared.borrow().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops queued events and rejects all later sends.
    pub fn close(&self) {
        let mut shared = self.shared.borrow_mut();
        shared.closed = true;
        shared.events.clear();
    }

    pub fn is_closed(&self) -> bool {
        self.shared.borrow().closed
    }
}

/// Cloneable producer half of an [`EventQueue`].
#[derive(Clone, Debug)]
pub struct EventSender {
    shared: Rc<RefCell<Shared>>,
}

impl EventSender {
    /// Enqueues `event`. Returns `false` once the queue is closed.
    pub fn send(&self, event: Event) -> bool {
        let mut shared = self.shared.borrow_mut();
        if shared.closed {
            vtrace!(?event, "EventSender: queue closed, dropping event");
            return false;
        }
        shared.events.push_back(event);
        true
    }

    pub fn measured(&self, index: usize, height: f64) -> bool {
        self.send(Event::Measured { index, height })
    }
}
