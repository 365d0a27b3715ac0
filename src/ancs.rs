//! Ingress from the ANCS (Apple Notification Center Service) client.
//!
//! The BLE side calls into [`AncsHandler`] from its own context. The
//! handler filters placeholders, resolves the app name, logs the
//! notification, and enqueues a [`PendingEvent`] without blocking. The
//! store is only touched later, when the main loop drains the queue.

use core::sync::atomic::{AtomicBool, Ordering};

use defmt_or_log as log;
use embassy_sync::blocking_mutex::raw::RawMutex;

use crate::apps::AppNames;
use crate::notification::{
    Category, Enqueued, EventKind, EventQueue, PendingEvent, INVALID_IDENTIFIER,
};

/// Shown in place of a missing title.
pub const NO_TITLE: &str = "(none)";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectionState {
    Connected,
    Disconnected,
}

/// One notification as reported by the ANCS client, borrowing its text.
#[derive(Clone, Copy, Debug, Default)]
pub struct AncsNotification<'a> {
    pub uid: u32,
    pub category_id: u8,
    pub category_count: u8,
    /// Seconds since epoch, 0 if the phone sent no date.
    pub timestamp: u32,
    pub app_identifier: &'a str,
    pub title: &'a str,
    pub message: &'a str,
}

impl AncsNotification<'_> {
    /// ANCS sometimes emits records with no uid and no text.
    pub fn is_placeholder(&self) -> bool {
        self.uid == INVALID_IDENTIFIER
            && self.app_identifier.is_empty()
            && self.title.is_empty()
            && self.message.is_empty()
    }

    pub fn category(&self) -> Category {
        Category::from_id(self.category_id)
    }
}

/// Turns ANCS callbacks into queued events.
pub struct AncsHandler<'a, M: RawMutex, A: AppNames, const Q: usize> {
    queue: &'a EventQueue<M, Q>,
    apps: &'a A,
    connected: AtomicBool,
    ready_logged: AtomicBool,
}

impl<'a, M: RawMutex, A: AppNames, const Q: usize> AncsHandler<'a, M, A, Q> {
    pub const fn new(queue: &'a EventQueue<M, Q>, apps: &'a A) -> Self {
        Self {
            queue,
            apps,
            connected: AtomicBool::new(false),
            ready_logged: AtomicBool::new(false),
        }
    }

    pub fn on_connection_state_changed(&self, state: ConnectionState) {
        match state {
            ConnectionState::Connected => {
                log::info!("Connected, ANCS client starting");
                self.connected.store(true, Ordering::Release);
            }
            ConnectionState::Disconnected => {
                log::info!("Disconnected");
                self.connected.store(false, Ordering::Release);
                self.ready_logged.store(false, Ordering::Relaxed);
            }
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    /// Queue an `Add` for `notification`. Returns `None` for placeholders.
    pub fn on_notification_arrived(&self, notification: &AncsNotification<'_>) -> Option<Enqueued> {
        if !self.ready_logged.swap(true, Ordering::Relaxed) {
            log::info!("ANCS ready/subscribed");
        }
        if notification.is_placeholder() {
            log::debug!("Ignoring empty placeholder notification");
            return None;
        }

        log::info!("Notification received");
        self.log_details(notification);

        let app = self.apps.resolve(notification.app_identifier);
        let title = if notification.title.is_empty() {
            NO_TITLE
        } else {
            notification.title
        };
        let event = PendingEvent::add(notification.uid, app, title, notification.message)
            .with_category(notification.category(), notification.category_count)
            .with_timestamp(notification.timestamp);
        Some(self.queue.enqueue(event))
    }

    /// Queue a `Remove` for `notification`. Returns `None` for placeholders.
    pub fn on_notification_removed(&self, notification: &AncsNotification<'_>) -> Option<Enqueued> {
        if notification.is_placeholder() {
            return None;
        }

        log::info!("Notification removed");
        self.log_details(notification);

        let event = PendingEvent::new(EventKind::Remove, notification.uid)
            .with_category(notification.category(), notification.category_count)
            .with_timestamp(notification.timestamp);
        Some(self.queue.enqueue(event))
    }

    fn log_details(&self, notification: &AncsNotification<'_>) {
        log::info!("App: {}", self.apps.resolve(notification.app_identifier));
        log::info!("Title: {}", non_empty_or(notification.title, NO_TITLE));
        log::info!("Message: {}", non_empty_or(notification.message, NO_TITLE));
        if notification.timestamp != 0 {
            log::info!("Date: {}", notification.timestamp);
        } else {
            log::info!("Date: (not provided)");
        }
        log::info!("Category: {}", notification.category().description());
        log::info!("CategoryCount: {}", notification.category_count);
        log::info!("UID: {}", notification.uid);
    }
}

fn non_empty_or<'s>(text: &'s str, fallback: &'s str) -> &'s str {
    if text.is_empty() {
        fallback
    } else {
        text
    }
}
