//! Render coordination between the notification store and the display.
//!
//! The store builds a [`DisplaySnapshot`] while its own lock is held,
//! releases that lock, and only then calls [`Render::render`]. The
//! coordinator serializes draw requests behind a second, render-only
//! lock so frames from different triggers never interleave. The two
//! locks are never held at the same time.

use core::cell::RefCell;
use core::fmt::Write;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use heapless::String;

use crate::notification::{AppText, MessageText, TitleText};

/// Lines shown while no notification is stored.
pub const EMPTY_LINE_1: &str = "No";
pub const EMPTY_LINE_2: &str = "Notifications";

/// Draw requests understood by the display collaborator.
pub trait NotificationDisplay {
    /// Nothing stored.
    fn show_empty(&mut self);

    /// One notification plus its 1-based `position` of `total`.
    fn show_notification(
        &mut self,
        app: &str,
        contact: &str,
        message: &str,
        position: usize,
        total: usize,
    );

    /// Two free-form lines, used for startup / status messages.
    fn show_status(&mut self, line1: &str, line2: &str);
}

/// Display that draws nothing. Installed when the real panel fails to
/// initialise so the rest of the pipeline keeps running.
#[derive(Default)]
pub struct NullDisplay;

impl NotificationDisplay for NullDisplay {
    fn show_empty(&mut self) {}

    fn show_notification(&mut self, _: &str, _: &str, _: &str, _: usize, _: usize) {}

    fn show_status(&mut self, _: &str, _: &str) {}
}

/// Self-contained copy of the store's current selection.
///
/// Owns its text, so it stays valid after the store lock is released.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DisplaySnapshot {
    Empty,
    Notification {
        app: AppText,
        contact: TitleText,
        message: MessageText,
        /// 0-based cursor at snapshot time.
        index: usize,
        total: usize,
    },
}

impl DisplaySnapshot {
    pub fn has_current(&self) -> bool {
        matches!(self, DisplaySnapshot::Notification { .. })
    }
}

/// Anything that can put a snapshot on screen.
pub trait Render {
    fn render(&self, snapshot: &DisplaySnapshot);
}

/// 1-based position for a cursor, clamped so a stale index never points
/// past the last entry. Returns 0 when `total` is 0.
pub fn display_position(index: usize, total: usize) -> usize {
    if total == 0 {
        return 0;
    }
    index.min(total - 1) + 1
}

/// "position/total" label drawn in the corner of the notification view.
pub fn position_label(position: usize, total: usize) -> String<24> {
    let mut label = String::new();
    let _ = write!(label, "{}/{}", position, total);
    label
}

/// Serializes draw requests to a [`NotificationDisplay`].
pub struct RenderCoordinator<M: RawMutex, D> {
    display: Mutex<M, RefCell<D>>,
}

impl<M: RawMutex, D: NotificationDisplay> RenderCoordinator<M, D> {
    pub const fn new(display: D) -> Self {
        Self {
            display: Mutex::new(RefCell::new(display)),
        }
    }

    /// Draw a status screen under the render lock.
    pub fn show_status(&self, line1: &str, line2: &str) {
        self.with_display(|display| display.show_status(line1, line2));
    }

    /// Run `f` against the display under the render lock.
    pub fn with_display<R>(&self, f: impl FnOnce(&mut D) -> R) -> R {
        self.display.lock(|display| f(&mut display.borrow_mut()))
    }
}

impl<M: RawMutex, D: NotificationDisplay> Render for RenderCoordinator<M, D> {
    fn render(&self, snapshot: &DisplaySnapshot) {
        self.with_display(|display| match snapshot {
            DisplaySnapshot::Empty => display.show_empty(),
            DisplaySnapshot::Notification {
                app,
                contact,
                message,
                index,
                total,
            } => display.show_notification(
                app,
                contact,
                message,
                display_position(*index, *total),
                *total,
            ),
        });
    }
}
