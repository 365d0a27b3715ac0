//! Bounded, drop-oldest handoff from the BLE callback context to the
//! main loop.
//!
//! `enqueue` never blocks and never allocates: when the ring is full the
//! oldest buffered event is discarded to make room, so a slow consumer
//! can never stall the radio stack and newer information wins over stale
//! queued information. The lock is a short critical section around a
//! `heapless::Deque`.

use core::cell::RefCell;

use defmt_or_log as log;
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use heapless::Deque;

use super::PendingEvent;

/// Outcome of [`EventQueue::enqueue`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Enqueued {
    /// There was room; nothing was lost.
    Stored,
    /// The queue was full and its oldest event was discarded.
    DisplacedOldest,
}

struct Ring<const N: usize> {
    events: Deque<PendingEvent, N>,
    dropped: u32,
}

/// Fixed-capacity FIFO of [`PendingEvent`]s with a drop-oldest overwrite
/// policy.
pub struct EventQueue<M: RawMutex, const N: usize> {
    ring: Mutex<M, RefCell<Ring<N>>>,
}

impl<M: RawMutex, const N: usize> EventQueue<M, N> {
    pub const fn new() -> Self {
        Self {
            ring: Mutex::new(RefCell::new(Ring {
                events: Deque::new(),
                dropped: 0,
            })),
        }
    }

    /// Append `event`, discarding the oldest buffered event if full.
    pub fn enqueue(&self, event: PendingEvent) -> Enqueued {
        let (outcome, dropped) = self.ring.lock(|ring| {
            let mut ring = ring.borrow_mut();
            let mut outcome = Enqueued::Stored;
            if ring.events.is_full() {
                ring.events.pop_front();
                ring.dropped = ring.dropped.wrapping_add(1);
                outcome = Enqueued::DisplacedOldest;
            }
            // Cannot fail: a slot was freed above if needed.
            let _ = ring.events.push_back(event);
            (outcome, ring.dropped)
        });

        if outcome == Enqueued::DisplacedOldest {
            log::warn!("Event queue full, dropped oldest ({} total)", dropped);
        }
        outcome
    }

    /// Pop the oldest event, if any.
    pub fn dequeue(&self) -> Option<PendingEvent> {
        self.ring.lock(|ring| ring.borrow_mut().events.pop_front())
    }

    /// Pop up to `max_items` events in FIFO order and hand each to
    /// `dispatch`. Each event is popped under the lock and dispatched
    /// after it is released. Returns how many were dispatched.
    pub fn drain(&self, max_items: usize, mut dispatch: impl FnMut(PendingEvent)) -> usize {
        let mut count = 0;
        while count < max_items {
            let Some(event) = self.dequeue() else {
                break;
            };
            dispatch(event);
            count += 1;
        }
        count
    }

    pub fn len(&self) -> usize {
        self.ring.lock(|ring| ring.borrow().events.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Events discarded by the drop-oldest policy since startup.
    pub fn dropped(&self) -> u32 {
        self.ring.lock(|ring| ring.borrow().dropped)
    }
}

impl<M: RawMutex, const N: usize> Default for EventQueue<M, N> {
    fn default() -> Self {
        Self::new()
    }
}
