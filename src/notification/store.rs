//! Ordered notification store with a selection cursor.
//!
//! [`Notifications`] is the plain list logic (upsert, removal, cyclic
//! cursor). [`NotificationStore`] wraps it in one store-wide lock and
//! renders after every mutation: the snapshot is built while the lock is
//! held, the lock is released, then the snapshot is rendered. A slow
//! display therefore never blocks the BLE side or the buttons from
//! reaching the store, and the store lock is never held while the render
//! lock is taken.
//!
//! Invariants (checked by the tests):
//!   - `current < len` whenever `len > 0`, `current == 0` when empty
//!   - at most one entry per identifier, except the reserved identifier 0
//!   - `len <= N`; adding a new identifier to a full store evicts the oldest

use core::cell::RefCell;

use defmt_or_log as log;
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use heapless::Vec;

use super::{
    truncated, AppText, EventKind, MessageText, PendingEvent, TitleText, INVALID_IDENTIFIER,
};
use crate::error::Error;
use crate::render::{DisplaySnapshot, Render};

/// A notification as kept by the store.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StoredNotification {
    pub app: AppText,
    pub contact: TitleText,
    pub message: MessageText,
    pub identifier: u32,
}

/// What [`Notifications::add`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AddOutcome {
    /// New entry appended.
    Inserted,
    /// Existing entry with the same identifier overwritten in place.
    Updated,
    /// Store was full; the oldest entry was dropped before appending.
    InsertedEvicting,
}

/// Bounded, insertion-ordered list of notifications plus a cursor.
#[derive(Clone, Debug, Default)]
pub struct Notifications<const N: usize> {
    entries: Vec<StoredNotification, N>,
    current: usize,
}

impl<const N: usize> Notifications<N> {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            current: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> Option<&StoredNotification> {
        self.entries.get(self.current)
    }

    pub fn get(&self, index: usize) -> Option<&StoredNotification> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StoredNotification> {
        self.entries.iter()
    }

    /// Linear scan; the store only ever holds a handful of entries.
    /// The reserved identifier never matches.
    pub fn find_index_by_identifier(&self, identifier: u32) -> Option<usize> {
        if identifier == INVALID_IDENTIFIER {
            return None;
        }
        self.entries.iter().position(|n| n.identifier == identifier)
    }

    /// Upsert by identifier and select the added / updated entry.
    pub fn add(&mut self, app: &str, contact: &str, message: &str, identifier: u32) -> AddOutcome {
        if let Some(index) = self.find_index_by_identifier(identifier) {
            let entry = &mut self.entries[index];
            entry.app = truncated(app);
            entry.contact = truncated(contact);
            entry.message = truncated(message);
            self.current = index;
            return AddOutcome::Updated;
        }

        let mut outcome = AddOutcome::Inserted;
        if self.entries.is_full() {
            self.remove_at(0);
            outcome = AddOutcome::InsertedEvicting;
        }

        let pushed = self.entries.push(StoredNotification {
            app: truncated(app),
            contact: truncated(contact),
            message: truncated(message),
            identifier,
        });
        // Only a zero-capacity store has no room after eviction.
        if pushed.is_ok() {
            self.current = self.entries.len() - 1;
        }
        outcome
    }

    /// Erase the entry at `index`. Returns `false` without touching
    /// anything if `index` is out of bounds.
    ///
    /// Removing at or before the cursor moves the cursor back one slot
    /// (saturating at 0).
    pub fn remove_at(&mut self, index: usize) -> bool {
        if index >= self.entries.len() {
            return false;
        }

        self.entries.remove(index);
        if index <= self.current {
            self.current = self.current.saturating_sub(1);
        }
        if self.current >= self.entries.len() {
            self.current = self.entries.len().saturating_sub(1);
        }
        true
    }

    pub fn remove_by_identifier(&mut self, identifier: u32) -> bool {
        match self.find_index_by_identifier(identifier) {
            Some(index) => self.remove_at(index),
            None => false,
        }
    }

    pub fn remove_current(&mut self) -> bool {
        self.remove_at(self.current)
    }

    /// Advance the cursor, wrapping from the last entry to the first.
    pub fn next(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        self.current = (self.current + 1) % self.entries.len();
    }

    /// Owned copy of the current selection.
    pub fn snapshot(&self) -> DisplaySnapshot {
        match self.current() {
            Some(n) => DisplaySnapshot::Notification {
                app: n.app.clone(),
                contact: n.contact.clone(),
                message: n.message.clone(),
                index: self.current,
                total: self.entries.len(),
            },
            None => DisplaySnapshot::Empty,
        }
    }
}

/// The shared store: one lock serializes every mutation from every
/// context, and each mutation is followed (outside the lock) by a render
/// of its resulting state.
pub struct NotificationStore<'r, M: RawMutex, R: Render, const N: usize> {
    list: Mutex<M, RefCell<Notifications<N>>>,
    renderer: &'r R,
}

impl<'r, M: RawMutex, R: Render, const N: usize> NotificationStore<'r, M, R, N> {
    pub const fn new(renderer: &'r R) -> Self {
        Self {
            list: Mutex::new(RefCell::new(Notifications::new())),
            renderer,
        }
    }

    /// Run `f` under the store lock. If it asks for a render, the
    /// snapshot is taken before the lock is released and drawn after.
    fn mutate<T>(&self, f: impl FnOnce(&mut Notifications<N>) -> (T, bool)) -> T {
        let (result, snapshot) = self.list.lock(|list| {
            let mut list = list.borrow_mut();
            let (result, render) = f(&mut list);
            (result, render.then(|| list.snapshot()))
        });

        if let Some(snapshot) = snapshot {
            self.renderer.render(&snapshot);
        }
        result
    }

    /// Upsert a notification and make it the current one.
    pub fn add(&self, app: &str, contact: &str, message: &str, identifier: u32) -> AddOutcome {
        let (outcome, index, total) = self.mutate(|list| {
            let outcome = list.add(app, contact, message, identifier);
            ((outcome, list.current_index(), list.len()), true)
        });

        match outcome {
            AddOutcome::Updated => {
                log::info!("Updated notification {} ({}/{})", identifier, index + 1, total);
            }
            AddOutcome::Inserted => {
                log::info!("Stored notification {} ({}/{})", identifier, index + 1, total);
            }
            AddOutcome::InsertedEvicting => {
                log::warn!("Store full, evicted oldest for notification {}", identifier);
            }
        }
        outcome
    }

    pub fn remove_at(&self, index: usize) -> bool {
        self.mutate(|list| {
            let removed = list.remove_at(index);
            (removed, removed || list.is_empty())
        })
    }

    /// Keep the store in step with upstream "notification removed" events.
    pub fn remove_by_identifier(&self, identifier: u32) -> bool {
        let removed = self.mutate(|list| {
            let removed = list.remove_by_identifier(identifier);
            (removed, removed || list.is_empty())
        });
        if !removed {
            log::debug!("Remove for unknown notification {}", identifier);
        }
        removed
    }

    pub fn remove_current(&self) -> bool {
        self.mutate(|list| {
            let removed = list.remove_current();
            (removed, true)
        })
    }

    /// Like [`remove_at`](Self::remove_at), with a typed failure.
    pub fn try_remove_at(&self, index: usize) -> Result<(), Error> {
        if self.remove_at(index) {
            Ok(())
        } else {
            Err(Error::IndexOutOfBounds)
        }
    }

    /// Like [`remove_by_identifier`](Self::remove_by_identifier), with a
    /// typed failure.
    pub fn try_remove_by_identifier(&self, identifier: u32) -> Result<(), Error> {
        if self.remove_by_identifier(identifier) {
            Ok(())
        } else {
            Err(Error::UnknownIdentifier)
        }
    }

    pub fn next(&self) {
        self.mutate(|list| {
            list.next();
            ((), true)
        })
    }

    /// Render the present selection without changing anything.
    pub fn show_current(&self) {
        self.mutate(|_| ((), true))
    }

    pub fn find_index_by_identifier(&self, identifier: u32) -> Option<usize> {
        self.read(|list| list.find_index_by_identifier(identifier))
    }

    /// Apply one drained queue event: adds upsert, removes drop by
    /// identifier.
    pub fn apply(&self, event: &PendingEvent) {
        match event.kind {
            EventKind::Add => {
                self.add(&event.app, &event.title, &event.message, event.identifier);
            }
            EventKind::Remove => {
                self.remove_by_identifier(event.identifier);
            }
        }
    }

    /// Read-only access under the store lock.
    pub fn read<T>(&self, f: impl FnOnce(&Notifications<N>) -> T) -> T {
        self.list.lock(|list| f(&list.borrow()))
    }

    pub fn len(&self) -> usize {
        self.read(|list| list.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn current_index(&self) -> usize {
        self.read(|list| list.current_index())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type List = Notifications<10>;

    fn ids(list: &List) -> std::vec::Vec<u32> {
        ids_of(list)
    }

    fn ids_of<const N: usize>(list: &Notifications<N>) -> std::vec::Vec<u32> {
        list.iter().map(|n| n.identifier).collect()
    }

    fn assert_cursor_valid<const N: usize>(list: &Notifications<N>) {
        if list.is_empty() {
            assert_eq!(list.current_index(), 0);
        } else {
            assert!(list.current_index() < list.len());
        }
    }

    #[test]
    fn add_new_appends_and_selects() {
        let mut list = List::new();
        assert_eq!(list.add("Mail", "Alice", "Hi", 7), AddOutcome::Inserted);
        assert_eq!(list.add("Phone", "Bob", "", 9), AddOutcome::Inserted);
        assert_eq!(list.len(), 2);
        assert_eq!(list.current().map(|n| n.identifier), Some(9));
    }

    #[test]
    fn add_existing_updates_in_place_and_selects() {
        let mut list = List::new();
        list.add("Mail", "Alice", "Hi", 7);
        list.add("Phone", "Bob", "", 9);
        assert_eq!(list.add("Mail", "Alice", "Hi edited", 7), AddOutcome::Updated);

        assert_eq!(list.len(), 2);
        assert_eq!(list.current_index(), 0);
        assert_eq!(list.current().map(|n| n.message.as_str()), Some("Hi edited"));
        assert_eq!(ids(&list), [7, 9]);
    }

    #[test]
    fn reserved_identifier_never_merges() {
        let mut list = List::new();
        list.add("A", "", "one", 0);
        list.add("B", "", "two", 0);
        assert_eq!(list.len(), 2);
        assert_eq!(list.find_index_by_identifier(0), None);
        assert!(!list.remove_by_identifier(0));
    }

    #[test]
    fn full_store_evicts_oldest() {
        let mut list: Notifications<3> = Notifications::new();
        for id in 1..=3 {
            list.add("App", "", "", id);
        }
        list.next(); // cursor wraps to entry 1
        assert_eq!(list.add("App", "", "", 4), AddOutcome::InsertedEvicting);
        assert_eq!(ids_of(&list), [2, 3, 4]);
        assert_eq!(list.current_index(), 2);

        // Updating an existing id on a full store does not evict.
        assert_eq!(list.add("App", "", "new", 2), AddOutcome::Updated);
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn remove_at_out_of_bounds_is_noop() {
        let mut list = List::new();
        assert!(!list.remove_at(0));
        list.add("Mail", "Alice", "Hi", 7);
        assert!(!list.remove_at(1));
        assert_eq!(list.len(), 1);
        assert_eq!(list.current_index(), 0);
    }

    #[test]
    fn remove_before_cursor_keeps_selection() {
        let mut list = List::new();
        for id in 1..=4 {
            list.add("App", "", "", id);
        }
        // cursor on id 4 (index 3)
        assert!(list.remove_at(1));
        assert_eq!(list.current().map(|n| n.identifier), Some(4));
        assert_cursor_valid(&list);
    }

    #[test]
    fn remove_after_cursor_keeps_cursor() {
        let mut list = List::new();
        for id in 1..=3 {
            list.add("App", "", "", id);
        }
        list.next(); // wraps to index 0
        assert!(list.remove_at(2));
        assert_eq!(list.current_index(), 0);
        assert_eq!(list.current().map(|n| n.identifier), Some(1));
    }

    #[test]
    fn remove_current_last_moves_back() {
        let mut list = List::new();
        for id in 1..=3 {
            list.add("App", "", "", id);
        }
        assert!(list.remove_current());
        assert_eq!(list.current().map(|n| n.identifier), Some(2));
        assert_cursor_valid(&list);
    }

    #[test]
    fn remove_only_entry_empties() {
        let mut list = List::new();
        list.add("Mail", "Alice", "Hi", 7);
        assert!(list.remove_current());
        assert!(list.is_empty());
        assert_eq!(list.current_index(), 0);
        assert_eq!(list.snapshot(), DisplaySnapshot::Empty);
        assert!(!list.remove_current());
    }

    #[test]
    fn next_cycles_with_period_len() {
        let mut list = List::new();
        for id in 1..=5 {
            list.add("App", "", "", id);
        }
        let start = list.current_index();
        let mut visited = std::vec::Vec::new();
        for _ in 0..5 {
            list.next();
            visited.push(list.current().map(|n| n.identifier).unwrap());
        }
        assert_eq!(list.current_index(), start);
        assert_eq!(visited, [1, 2, 3, 4, 5]);
    }

    #[test]
    fn next_on_empty_is_noop() {
        let mut list = List::new();
        list.next();
        assert_eq!(list.current_index(), 0);
        assert!(list.current().is_none());
    }

    #[test]
    fn snapshot_copies_current() {
        let mut list = List::new();
        list.add("Mail", "Alice", "Hi", 7);
        list.add("Phone", "Bob", "", 9);
        match list.snapshot() {
            DisplaySnapshot::Notification {
                app,
                contact,
                index,
                total,
                ..
            } => {
                assert_eq!(app.as_str(), "Phone");
                assert_eq!(contact.as_str(), "Bob");
                assert_eq!(index, 1);
                assert_eq!(total, 2);
            }
            DisplaySnapshot::Empty => panic!("expected a notification"),
        }
    }

    #[test]
    fn cursor_invariant_holds_over_mixed_sequence() {
        // Deterministic pseudo-random walk over all mutating operations.
        let mut list: Notifications<6> = Notifications::new();
        let mut seed: u32 = 0x1234_5678;
        for _ in 0..2_000 {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            let arg = (seed >> 8) % 9;
            match seed % 5 {
                0 | 1 => {
                    list.add("App", "", "", arg);
                }
                2 => {
                    list.remove_at(arg as usize);
                }
                3 => {
                    list.remove_by_identifier(arg);
                }
                _ => list.next(),
            }
            assert_cursor_valid(&list);
            let mut seen = std::vec::Vec::new();
            for n in list.iter().filter(|n| n.identifier != 0) {
                assert!(!seen.contains(&n.identifier));
                seen.push(n.identifier);
            }
        }
    }

    #[test]
    fn zero_capacity_store_stays_empty() {
        let mut list: Notifications<0> = Notifications::new();
        list.add("App", "", "", 1);
        list.add("App", "", "", 2);
        assert!(list.is_empty());
        assert_eq!(list.current_index(), 0);
        assert_eq!(list.snapshot(), DisplaySnapshot::Empty);
    }

    #[test]
    fn clearing_a_middle_entry_selects_the_one_before() {
        let mut list = List::new();
        for id in 1..=4 {
            list.add("App", "", "", id);
        }
        list.next();
        list.next();
        assert_eq!(list.current().map(|n| n.identifier), Some(2));

        assert!(list.remove_current());
        assert_eq!(list.current().map(|n| n.identifier), Some(1));
        assert_eq!(ids(&list), [1, 3, 4]);
    }
}
