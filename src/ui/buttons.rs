//! GPIO button inputs (active-low with internal pull-up):
//!   - NEXT  - page to the next stored notification
//!   - CLEAR - dismiss the notification on screen
//!
//! Both pins are owned here. The main loop races its tick against
//! [`Buttons::wait_edge`]; a falling edge stamps the matching
//! [`EdgeLatch`] immediately, and the tick samples raw levels for the poll
//! path. Debounce decisions are made in [`crate::ui::debounce`].

use defmt::trace;
use embassy_futures::select::{select, Either};
use embassy_nrf::gpio::Input;
use embassy_time::Instant;

use crate::pager::PinLevels;
use crate::ui::debounce::EdgeLatch;
use crate::ui::Button;

pub struct Buttons<'d> {
    next: Input<'d>,
    clear: Input<'d>,
    next_latch: &'d EdgeLatch,
    clear_latch: &'d EdgeLatch,
}

impl<'d> Buttons<'d> {
    pub fn new(
        next: Input<'d>,
        clear: Input<'d>,
        next_latch: &'d EdgeLatch,
        clear_latch: &'d EdgeLatch,
    ) -> Self {
        Self {
            next,
            clear,
            next_latch,
            clear_latch,
        }
    }

    /// Raw levels for the poll path.
    pub fn levels(&self) -> PinLevels {
        PinLevels {
            next_high: self.next.is_high(),
            clear_high: self.clear.is_high(),
        }
    }

    /// Wait for a falling edge on either button and feed its latch.
    ///
    /// Cancel-safe: dropping the future before an edge loses nothing the
    /// poll path would not catch on the next tick.
    pub async fn wait_edge(&mut self) -> Button {
        let edge = select(
            self.next.wait_for_falling_edge(),
            self.clear.wait_for_falling_edge(),
        )
        .await;
        let now_us = Instant::now().as_micros() as u32;

        let (button, latch) = match edge {
            Either::First(()) => (Button::Next, self.next_latch),
            Either::Second(()) => (Button::Clear, self.clear_latch),
        };
        if latch.on_falling_edge(now_us) {
            trace!("Edge latched: {}", button);
        }
        button
    }
}
