//! Ordered storage for the events of a reduction pass.

use crate::event::Event;
use std::ops::Range;

#[derive(Debug, Clone)]
struct Slot {
    ts: u64,
    seq: u64,
    event: Event,
}

impl Slot {
    fn key(&self) -> (u64, u64) {
        (self.ts, self.seq)
    }
}

/// Events ordered by timestamp, ties broken by insertion order.
///
/// Every inserted event gets a sequence number, so the `(ts, seq)` key is
/// unique and ordering never depends on where equal timestamps happen to
/// land. Positions are plain indices; span operations return the position
/// to resume scanning from.
#[derive(Debug, Clone, Default)]
pub struct EventStore {
    slots: Vec<Slot>,
    next_seq: u64,
}

impl EventStore {
    /// An empty store.
    pub fn new() -> Self {
        EventStore::default()
    }

    /// Insert an event after every event with a lower or equal timestamp.
    ///
    /// Returns the index it landed at. With timestamp-ordered input this is
    /// always the end of the store.
    pub fn insert(&mut self, event: Event) -> usize {
        let seq = self.bump_seq();
        let slot = Slot {
            ts: event.ts,
            seq,
            event,
        };
        let at = self.slots.partition_point(|s| s.key() <= slot.key());
        self.slots.insert(at, slot);
        at
    }

    /// The most recently ordered event.
    pub fn last(&self) -> Option<&Event> {
        self.slots.last().map(|s| &s.event)
    }

    /// Take the most recently ordered event out of the store.
    pub fn pop_last(&mut self) -> Option<Event> {
        self.slots.pop().map(|s| s.event)
    }

    /// The event at `index`.
    pub fn get(&self, index: usize) -> Option<&Event> {
        self.slots.get(index).map(|s| &s.event)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Event> {
        self.slots.get_mut(index).map(|s| &mut s.event)
    }

    /// Remove the event at `index`, shifting later events down.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn remove(&mut self, index: usize) -> Event {
        self.slots.remove(index).event
    }

    /// Replace the events in `span` with a single event and return its index.
    ///
    /// The replacement takes over the ordering slot of the span's first
    /// event, re-stamped with its own timestamp. Its timestamp must lie
    /// between the span's first and last timestamps.
    ///
    /// # Panics
    ///
    /// Panics if `span` is empty or out of bounds.
    pub fn replace_span(&mut self, span: Range<usize>, event: Event) -> usize {
        assert!(!span.is_empty(), "replace_span on an empty span");
        let first = &self.slots[span.start];
        let last = &self.slots[span.end - 1];
        debug_assert!(first.ts <= event.ts && event.ts <= last.ts);

        let slot = Slot {
            ts: event.ts,
            seq: first.seq,
            event,
        };
        let at = span.start;
        self.slots.splice(span, std::iter::once(slot));
        at
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Events in order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Event> {
        self.slots.iter().map(|s| &s.event)
    }

    /// Consume the store, keeping the order.
    pub fn into_events(self) -> Vec<Event> {
        self.slots.into_iter().map(|s| s.event).collect()
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Change, ObjectKind};
    use crate::path::ObjectPath;

    fn create(ts: u64, path: &str) -> Event {
        Event::new(
            ts,
            ObjectKind::Folder,
            Change::Create {
                path: ObjectPath::parse(path).unwrap(),
                hash: None,
            },
        )
    }

    fn paths(store: &EventStore) -> Vec<String> {
        store.iter().map(|e| e.path().to_string()).collect()
    }

    #[test]
    fn ties_keep_insertion_order() {
        let mut store = EventStore::new();
        store.insert(create(5, "/a"));
        store.insert(create(5, "/b"));
        store.insert(create(5, "/c"));
        assert_eq!(paths(&store), ["/a", "/b", "/c"]);
    }

    #[test]
    fn late_timestamp_sorts_into_place() {
        let mut store = EventStore::new();
        store.insert(create(1, "/a"));
        store.insert(create(3, "/c"));
        let at = store.insert(create(2, "/b"));
        assert_eq!(at, 1);
        assert_eq!(paths(&store), ["/a", "/b", "/c"]);
    }

    #[test]
    fn replace_span_returns_position() {
        let mut store = EventStore::new();
        for (ts, p) in [(1, "/a"), (2, "/b"), (3, "/c"), (4, "/d")] {
            store.insert(create(ts, p));
        }
        let at = store.replace_span(1..3, create(2, "/bc"));
        assert_eq!(at, 1);
        assert_eq!(paths(&store), ["/a", "/bc", "/d"]);

        // Later inserts still land after the replacement.
        store.insert(create(2, "/late"));
        assert_eq!(paths(&store), ["/a", "/bc", "/late", "/d"]);
    }

    #[test]
    fn remove_and_pop() {
        let mut store = EventStore::new();
        store.insert(create(1, "/a"));
        store.insert(create(2, "/b"));
        store.insert(create(3, "/c"));
        assert_eq!(store.remove(1).path().to_string(), "/b");
        assert_eq!(store.pop_last().unwrap().path().to_string(), "/c");
        assert_eq!(store.len(), 1);
        assert_eq!(store.last().unwrap().path().to_string(), "/a");
    }
}
