//! beepr - on-device core of a BLE notification pager.
//!
//! The pure pipeline logic lives here so it can be tested on the host
//! (no embedded hardware required):
//!
//! ```text
//! ANCS callback ─► AncsHandler ─► EventQueue ─┐
//!                                             ├─► NotificationStore ─► RenderCoordinator ─► display
//! button edge ─► EdgeLatch ─► Pager::tick ────┘
//! ```
//!
//! Usage: `cargo test`
//!
//! Note: The embedded binary in main.rs is built with
//! `--features embedded` and pulls in the display, button and BLE
//! modules gated behind that feature.

#![cfg_attr(not(test), no_std)]

// ═══════════════════════════════════════════════════════════════════════════
// Host-testable core
// ═══════════════════════════════════════════════════════════════════════════

pub mod ancs;
pub mod apps;
pub mod config;
pub mod error;
pub mod notification;
pub mod pager;
pub mod render;
pub mod ui;

// ═══════════════════════════════════════════════════════════════════════════
// Firmware-only
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(feature = "embedded")]
pub mod ble;

pub use error::Error;
