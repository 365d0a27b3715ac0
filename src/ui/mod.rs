//! User interface subsystem - OLED display + physical buttons.
//!
//! ## Components
//!
//! - **Debounce**: interrupt latch + poll debouncer per button (host-testable)
//! - **Display**: SSD1306 128×64 OLED via I²C (embedded only)
//! - **Buttons**: pin ownership, edge wait feeding the latches (embedded only)

pub mod debounce;

#[cfg(feature = "embedded")]
pub mod buttons;
#[cfg(feature = "embedded")]
pub mod display;

/// Physical buttons (active-low, internal pull-up).
///
///   - NEXT:  advance to the next stored notification (wraps)
///   - CLEAR: remove the notification on screen
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    Next,
    Clear,
}
