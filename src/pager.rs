//! One main-loop tick: buttons first, then at most a few queued events.
//!
//! Button presses are handled before the queue is drained so that a burst
//! of incoming notifications adds at most `drain_per_tick` store
//! mutations of latency to a press on the same tick.

use embassy_sync::blocking_mutex::raw::RawMutex;

use crate::notification::{EventQueue, NotificationStore};
use crate::render::Render;
use crate::ui::debounce::{ButtonInput, EdgeLatch};
use crate::ui::Button;

/// Raw pin levels sampled at the start of a tick (`true` = HIGH = released).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PinLevels {
    pub next_high: bool,
    pub clear_high: bool,
}

impl PinLevels {
    pub const RELEASED: PinLevels = PinLevels {
        next_high: true,
        clear_high: true,
    };
}

/// What happened during one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickReport {
    pub next_pressed: bool,
    pub clear_pressed: bool,
    pub drained: usize,
}

/// Main-loop driver tying buttons and the event queue to the store.
pub struct Pager<'a, M: RawMutex, R: Render, const N: usize, const Q: usize> {
    store: &'a NotificationStore<'a, M, R, N>,
    queue: &'a EventQueue<M, Q>,
    next: ButtonInput<'a>,
    clear: ButtonInput<'a>,
    drain_per_tick: usize,
}

impl<'a, M: RawMutex, R: Render, const N: usize, const Q: usize> Pager<'a, M, R, N, Q> {
    pub fn new(
        store: &'a NotificationStore<'a, M, R, N>,
        queue: &'a EventQueue<M, Q>,
        latches: (&'a EdgeLatch, &'a EdgeLatch),
        debounce_ms: u32,
        drain_per_tick: usize,
    ) -> Self {
        Self {
            store,
            queue,
            next: ButtonInput::new(latches.0, debounce_ms),
            clear: ButtonInput::new(latches.1, debounce_ms),
            drain_per_tick,
        }
    }

    pub fn tick(&mut self, levels: PinLevels, now_ms: u32) -> TickReport {
        let mut report = TickReport::default();

        if self.next.take_press(levels.next_high, now_ms) {
            self.press(Button::Next);
            report.next_pressed = true;
        }
        if self.clear.take_press(levels.clear_high, now_ms) {
            self.press(Button::Clear);
            report.clear_pressed = true;
        }

        let store = self.store;
        report.drained = self
            .queue
            .drain(self.drain_per_tick, |event| store.apply(&event));
        report
    }

    /// Dispatch the action bound to `button`.
    pub fn press(&self, button: Button) {
        match button {
            Button::Next => self.store.next(),
            Button::Clear => {
                self.store.remove_current();
            }
        }
    }
}
