//! Application-wide constants and compile-time configuration.
//!
//! All hardware pin assignments, timing parameters, and buffer bounds
//! live here so they can be tuned in one place.

// BLE

/// Name advertised to the phone.
pub const DEVICE_NAME: &str = "BEEPR";

/// Advertising interval (in 0.625 ms units). 400 = 250 ms.
pub const BLE_ADV_INTERVAL: u32 = 400;

/// Advertising interval in pairing mode. 32 = 20 ms.
pub const BLE_ADV_INTERVAL_FAST: u32 = 32;

/// Period of the keep-alive nudge sent to the BLE side (seconds).
pub const KEEPALIVE_SECS: u64 = 20;

// Event pipeline

/// Capacity of the BLE → main loop event queue.
pub const EVENT_QUEUE_CAPACITY: usize = 24;

/// Events drained from the queue per main-loop tick.
///
/// Kept at 1 so a burst of notifications never delays button handling
/// on the same tick by more than one store mutation.
pub const EVENT_DRAIN_PER_TICK: usize = 1;

/// Main loop tick period (ms).
pub const MAIN_LOOP_TICK_MS: u64 = 10;

// Notification store

/// Maximum notifications held at once. Adding past this evicts the oldest.
pub const MAX_NOTIFICATIONS: usize = 10;

/// Byte bounds for the three text fields of a notification.
pub const APP_NAME_LEN: usize = 32;
pub const TITLE_LEN: usize = 64;
pub const MESSAGE_LEN: usize = 128;

// GPIO pin assignments (nRF52840-DK defaults)
//
// These are logical names; actual `embassy_nrf::peripherals::*` types are
// selected in `main.rs`.  Adjust for your custom PCB.
//
//   Button NEXT    → P0.11
//   Button CLEAR   → P0.12
//   Pairing strap  → P0.24  (held low at boot = fast advertising interval)
//   I²C SDA        → P0.26
//   I²C SCL        → P0.27

/// Button debounce window (ms).
pub const BUTTON_DEBOUNCE_MS: u32 = 50;

/// Same window in microseconds, for the edge (interrupt) path.
pub const BUTTON_DEBOUNCE_US: u32 = BUTTON_DEBOUNCE_MS * 1_000;
