use crate::event::{Event, EventKind};
use std::collections::VecDeque;

/// Bounded log of the most recent events, oldest first.
///
/// Only the bus mutates it; readers always get owned snapshots.
#[derive(Debug)]
pub struct HistoryBuffer<K, P> {
    capacity: usize,
    events: VecDeque<Event<K, P>>,
}

impl<K: EventKind, P> HistoryBuffer<K, P> {
    /// Capacity is clamped to at least 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            events: VecDeque::with_capacity(capacity),
        }
    }

    pub fn record(&mut self, event: Event<K, P>) {
        self.events.push_back(event);
        while self.events.len() > self.capacity {
            self.events.pop_front();
        }
    }

    pub fn recent(&self, kind: Option<K>) -> Vec<Event<K, P>> {
        match kind {
            Some(kind) => self
                .events
                .iter()
                .filter(|ev| ev.kind == kind)
                .cloned()
                .collect(),
            None => self.events.iter().cloned().collect(),
        }
    }

    /// Last `limit` events, still oldest first.
    pub fn latest(&self, limit: usize) -> Vec<Event<K, P>> {
        let skip = self.events.len().saturating_sub(limit);
        self.events.iter().skip(skip).cloned().collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
