//! Event data model shared by the registry, dispatcher and history buffer.
//!
//! The bus is generic over a kind type `K` and a payload type `P`. Kinds are
//! a closed set defined by the caller (usually a fieldless enum); payloads are
//! typically a tagged union with one variant per kind, see [`Tagged`].

use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Tag identifying which subscribers an event is delivered to.
///
/// Kinds are matched by equality only. The bus never validates that a kind
/// belongs to any particular set.
pub trait EventKind: Copy + Eq + Hash + Debug + Send + Sync + 'static {
    /// Stable wire tag, e.g. `"user-created"`.
    fn as_str(&self) -> &'static str;
}

impl EventKind for &'static str {
    fn as_str(&self) -> &'static str {
        self
    }
}

/// Payload that knows its own kind.
///
/// Lets emitters write `bus.publish(payload)` without repeating the kind.
pub trait Tagged {
    type Kind: EventKind;

    fn kind(&self) -> Self::Kind;
}

/// One emitted event.
///
/// Created once per `emit` and never mutated afterwards. Cloning is cheap:
/// the payload sits behind an `Arc` and is shared between the history buffer
/// and every subscriber that received it.
#[derive(Debug)]
pub struct Event<K, P> {
    /// Per-bus sequence number, starting at 0.
    pub seq: u64,
    pub kind: K,
    /// Monotonic creation time.
    pub at: Instant,
    /// Wall-clock creation time in Unix milliseconds.
    pub timestamp_ms: u64,
    payload: Arc<P>,
}

impl<K: EventKind, P> Event<K, P> {
    pub(crate) fn new(seq: u64, kind: K, payload: P) -> Self {
        Self {
            seq,
            kind,
            at: Instant::now(),
            timestamp_ms: unix_millis(),
            payload: Arc::new(payload),
        }
    }

    pub fn payload(&self) -> &P {
        &self.payload
    }

    /// Shared handle to the payload, for consumers that keep it past the callback.
    pub fn payload_arc(&self) -> Arc<P> {
        Arc::clone(&self.payload)
    }

    pub fn topic(&self) -> &'static str {
        self.kind.as_str()
    }
}

impl<K: Clone, P> Clone for Event<K, P> {
    fn clone(&self) -> Self {
        Self {
            seq: self.seq,
            kind: self.kind.clone(),
            at: self.at,
            timestamp_ms: self.timestamp_ms,
            payload: Arc::clone(&self.payload),
        }
    }
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis().min(u128::from(u64::MAX)) as u64)
        .unwrap_or(0)
}
