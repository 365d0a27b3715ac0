//! Button debouncing with two cooperating detectors.
//!
//! Buttons are active-low with pull-ups, so idle is HIGH and a press is
//! a HIGH→LOW transition.
//!
//! - [`EdgeLatch`] is written from the falling-edge context: lock-free,
//!   no allocation, constant time. It latches a pending
//!   press if the previous accepted edge is older than the window.
//! - [`PollDebouncer`] samples the pin every main-loop tick and commits a
//!   new stable level once the raw level has held for the window.
//! - [`ButtonInput`] is the main-loop side of one button. It merges both
//!   detectors into a single press per physical edge.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// Interrupt-side press latch for one button.
pub struct EdgeLatch {
    pending: AtomicBool,
    accepted_once: AtomicBool,
    last_accept_us: AtomicU32,
    window_us: u32,
}

impl EdgeLatch {
    pub const fn new(window_us: u32) -> Self {
        Self {
            pending: AtomicBool::new(false),
            accepted_once: AtomicBool::new(false),
            last_accept_us: AtomicU32::new(0),
            window_us,
        }
    }

    /// Record a falling edge seen at `now_us` (wrapping microsecond clock).
    ///
    /// Only ever called from the edge context. Returns whether the edge
    /// was accepted.
    pub fn on_falling_edge(&self, now_us: u32) -> bool {
        if self.accepted_once.load(Ordering::Relaxed) {
            let last = self.last_accept_us.load(Ordering::Relaxed);
            if now_us.wrapping_sub(last) <= self.window_us {
                return false;
            }
        }

        self.last_accept_us.store(now_us, Ordering::Relaxed);
        self.accepted_once.store(true, Ordering::Relaxed);
        self.pending.store(true, Ordering::Release);
        true
    }

    /// Consume the latched press, if any.
    pub fn take(&self) -> bool {
        self.pending.swap(false, Ordering::AcqRel)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }
}

/// Poll-side debouncer: raw sample in, stable HIGH→LOW transitions out.
#[derive(Clone, Copy, Debug)]
pub struct PollDebouncer {
    last_raw_high: bool,
    stable_high: bool,
    last_change_ms: u32,
    window_ms: u32,
}

impl PollDebouncer {
    /// Starts released (HIGH).
    pub const fn new(window_ms: u32) -> Self {
        Self {
            last_raw_high: true,
            stable_high: true,
            last_change_ms: 0,
            window_ms,
        }
    }

    /// Feed one raw sample. Returns `true` exactly when a new stable LOW
    /// level is committed after a stable HIGH.
    pub fn sample(&mut self, raw_high: bool, now_ms: u32) -> bool {
        if raw_high != self.last_raw_high {
            self.last_raw_high = raw_high;
            self.last_change_ms = now_ms;
        }

        if raw_high != self.stable_high
            && now_ms.wrapping_sub(self.last_change_ms) >= self.window_ms
        {
            self.stable_high = raw_high;
            return !raw_high;
        }
        false
    }

    /// Treat the button as already pressed so the poll path does not
    /// report the same edge a second time.
    pub fn absorb_press(&mut self) {
        self.stable_high = false;
    }

    pub fn is_released(&self) -> bool {
        self.stable_high
    }
}

/// Main-loop view of one button.
pub struct ButtonInput<'a> {
    latch: &'a EdgeLatch,
    poll: PollDebouncer,
}

impl<'a> ButtonInput<'a> {
    pub const fn new(latch: &'a EdgeLatch, window_ms: u32) -> Self {
        Self {
            latch,
            poll: PollDebouncer::new(window_ms),
        }
    }

    /// Called once per tick with the raw pin level. Returns `true` at most
    /// once per physical press.
    ///
    /// The latch is always cleared. A latched edge counts only while the
    /// poll path still sees the button released; edges latched while it is
    /// held down come from release bounce.
    pub fn take_press(&mut self, raw_high: bool, now_ms: u32) -> bool {
        let polled = self.poll.sample(raw_high, now_ms);
        let latched = self.latch.take();

        if polled {
            return true;
        }
        if latched && self.poll.is_released() {
            self.poll.absorb_press();
            return true;
        }
        false
    }
}
