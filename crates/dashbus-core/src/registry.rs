use crate::event::{Event, EventKind};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Callback invoked synchronously for every matching event.
///
/// Returning `Err` is reported and logged by the dispatcher; it never reaches
/// the emitter.
pub type Callback<K, P> = Arc<dyn Fn(&Event<K, P>) -> anyhow::Result<()> + Send + Sync>;

/// Identity of one `subscribe`/`subscribe_many` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

struct Entry<K, P> {
    id: SubscriptionId,
    callback: Callback<K, P>,
}

/// Kind -> subscribers, each list in registration order.
pub(crate) struct Registry<K, P> {
    by_kind: HashMap<K, Vec<Entry<K, P>>>,
}

impl<K: EventKind, P> Registry<K, P> {
    pub(crate) fn new() -> Self {
        Self {
            by_kind: HashMap::new(),
        }
    }

    pub(crate) fn insert(&mut self, kind: K, id: SubscriptionId, callback: Callback<K, P>) {
        self.by_kind
            .entry(kind)
            .or_default()
            .push(Entry { id, callback });
    }

    /// Removes every registration made under `id`; returns how many went away.
    pub(crate) fn remove(&mut self, id: SubscriptionId) -> usize {
        let mut removed = 0;
        self.by_kind.retain(|_, entries| {
            let before = entries.len();
            entries.retain(|e| e.id != id);
            removed += before - entries.len();
            !entries.is_empty()
        });
        removed
    }

    /// Copy of the current subscribers of `kind`, safe to call outside the lock.
    pub(crate) fn snapshot(&self, kind: &K) -> Vec<(SubscriptionId, Callback<K, P>)> {
        self.by_kind
            .get(kind)
            .map(|entries| {
                entries
                    .iter()
                    .map(|e| (e.id, Arc::clone(&e.callback)))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub(crate) fn contains(&self, id: SubscriptionId) -> bool {
        self.by_kind
            .values()
            .any(|entries| entries.iter().any(|e| e.id == id))
    }

    pub(crate) fn count(&self, kind: &K) -> usize {
        self.by_kind.get(kind).map_or(0, Vec::len)
    }

    /// Total registrations across kinds.
    pub(crate) fn len(&self) -> usize {
        self.by_kind.values().map(Vec::len).sum()
    }

    pub(crate) fn clear(&mut self) {
        self.by_kind.clear();
    }
}
