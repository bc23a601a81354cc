use dashbus_core::{EventBus, EventKind, Subscription};
use std::fmt::Debug;

/// Subscribes a `tracing` writer that logs every event of `kinds` at debug level.
pub fn log_events<K, P, I>(bus: &EventBus<K, P>, kinds: I) -> Subscription
where
    K: EventKind,
    P: Debug + Send + Sync + 'static,
    I: IntoIterator<Item = K>,
{
    bus.subscribe_many(kinds, |ev| {
        tracing::debug!(
            topic = ev.topic(),
            seq = ev.seq,
            payload = ?ev.payload(),
            "dashboard event"
        );
        Ok(())
    })
}
