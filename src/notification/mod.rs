//! Notification records and the BLE → main loop event pipeline.
//!
//! ## Components
//!
//! - **PendingEvent**: fixed-size add/remove record produced on the BLE side
//! - **EventQueue**: bounded drop-oldest handoff from the BLE context
//! - **NotificationStore**: ordered, lock-protected list with a cursor
//!
//! Text fields use `heapless::String` so nothing in the pipeline touches
//! a heap; overlong input is truncated on a UTF-8 character boundary.

pub mod queue;
pub mod store;

pub use queue::{Enqueued, EventQueue};
pub use store::{AddOutcome, NotificationStore, Notifications, StoredNotification};

use crate::config::{APP_NAME_LEN, MESSAGE_LEN, TITLE_LEN};
use heapless::String;

/// Identifier value reserved as "no notification".
pub const INVALID_IDENTIFIER: u32 = 0;

pub type AppText = String<APP_NAME_LEN>;
pub type TitleText = String<TITLE_LEN>;
pub type MessageText = String<MESSAGE_LEN>;

/// Copy `text` into a bounded string, dropping whatever does not fit.
pub fn truncated<const N: usize>(text: &str) -> String<N> {
    let mut out = String::new();
    for c in text.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

/// What a pending event asks the store to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EventKind {
    /// Upsert the notification.
    Add,
    /// Drop the notification with this identifier.
    Remove,
}

/// ANCS notification category.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Category {
    Other,
    IncomingCall,
    MissedCall,
    Voicemail,
    Social,
    Schedule,
    Email,
    News,
    HealthAndFitness,
    BusinessAndFinance,
    Location,
    Entertainment,
    /// Id outside the range ANCS defines.
    Unknown(u8),
}

impl Category {
    pub fn from_id(id: u8) -> Self {
        match id {
            0 => Category::Other,
            1 => Category::IncomingCall,
            2 => Category::MissedCall,
            3 => Category::Voicemail,
            4 => Category::Social,
            5 => Category::Schedule,
            6 => Category::Email,
            7 => Category::News,
            8 => Category::HealthAndFitness,
            9 => Category::BusinessAndFinance,
            10 => Category::Location,
            11 => Category::Entertainment,
            other => Category::Unknown(other),
        }
    }

    /// Human-readable description for logs.
    pub fn description(&self) -> &'static str {
        match self {
            Category::Other => "Other",
            Category::IncomingCall => "Incoming call",
            Category::MissedCall => "Missed call",
            Category::Voicemail => "Voicemail",
            Category::Social => "Social",
            Category::Schedule => "Schedule",
            Category::Email => "Email",
            Category::News => "News",
            Category::HealthAndFitness => "Health and fitness",
            Category::BusinessAndFinance => "Business and finance",
            Category::Location => "Location",
            Category::Entertainment => "Entertainment",
            Category::Unknown(_) => "Unknown",
        }
    }
}

/// One add/remove request handed from the BLE context to the main loop.
///
/// Moved by value into the queue and out again; never shared by reference
/// across contexts.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PendingEvent {
    pub kind: EventKind,
    /// Stable for the notification's lifetime. 0 is reserved.
    pub identifier: u32,
    pub category: Category,
    pub category_count: u8,
    /// Seconds since epoch, 0 = unknown.
    pub timestamp: u32,
    pub app: AppText,
    pub title: TitleText,
    pub message: MessageText,
}

impl PendingEvent {
    /// An event of `kind` with empty text and no metadata.
    pub fn new(kind: EventKind, identifier: u32) -> Self {
        Self {
            kind,
            identifier,
            category: Category::Other,
            category_count: 0,
            timestamp: 0,
            app: String::new(),
            title: String::new(),
            message: String::new(),
        }
    }

    /// An `Add` event; text longer than the field bounds is truncated.
    pub fn add(identifier: u32, app: &str, title: &str, message: &str) -> Self {
        Self {
            app: truncated(app),
            title: truncated(title),
            message: truncated(message),
            ..Self::new(EventKind::Add, identifier)
        }
    }

    pub fn remove(identifier: u32) -> Self {
        Self::new(EventKind::Remove, identifier)
    }

    pub fn with_category(mut self, category: Category, count: u8) -> Self {
        self.category = category;
        self.category_count = count;
        self
    }

    pub fn with_timestamp(mut self, timestamp: u32) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Reserved identifier and no text at all: nothing worth storing.
    pub fn is_placeholder(&self) -> bool {
        self.identifier == INVALID_IDENTIFIER
            && self.app.is_empty()
            && self.title.is_empty()
            && self.message.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncated_keeps_short_text() {
        let s: String<8> = truncated("Mail");
        assert_eq!(s.as_str(), "Mail");
    }

    #[test]
    fn truncated_cuts_at_capacity() {
        let s: String<4> = truncated("Messages");
        assert_eq!(s.as_str(), "Mess");
    }

    #[test]
    fn truncated_never_splits_a_character() {
        // "é" is two bytes; only one byte of room is left after "abc".
        let s: String<4> = truncated("abcé");
        assert_eq!(s.as_str(), "abc");
    }

    #[test]
    fn add_event_truncates_long_message() {
        let long = "x".repeat(MESSAGE_LEN + 40);
        let event = PendingEvent::add(3, "Mail", "Alice", &long);
        assert_eq!(event.message.len(), MESSAGE_LEN);
        assert_eq!(event.kind, EventKind::Add);
    }

    #[test]
    fn placeholder_detection() {
        assert!(PendingEvent::new(EventKind::Add, 0).is_placeholder());
        assert!(!PendingEvent::add(0, "", "", "hi").is_placeholder());
        assert!(!PendingEvent::remove(5).is_placeholder());
    }

    #[test]
    fn category_ids_map_both_ways() {
        assert_eq!(Category::from_id(6), Category::Email);
        assert_eq!(Category::from_id(1).description(), "Incoming call");
        assert_eq!(Category::from_id(42), Category::Unknown(42));
        assert_eq!(Category::Unknown(42).description(), "Unknown");
    }

    #[test]
    fn builders_set_metadata() {
        let event = PendingEvent::add(9, "Phone", "Bob", "")
            .with_category(Category::MissedCall, 2)
            .with_timestamp(1_700_000_000);
        assert_eq!(event.category, Category::MissedCall);
        assert_eq!(event.category_count, 2);
        assert_eq!(event.timestamp, 1_700_000_000);
    }
}
