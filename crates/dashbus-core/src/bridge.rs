//! Forwarding of bus events into a `tokio::sync::broadcast` channel.
//!
//! Synchronous subscribers run on the emitter's thread. Async consumers
//! (data-fetch hooks, background refreshers) instead hold a [`Bridge`] and
//! `recv().await` on it; the forwarding callback only does a non-blocking
//! `send`.

use crate::bus::EventBus;
use crate::event::{Event, EventKind};
use crate::subscription::SubscriptionGuard;
use tokio::sync::broadcast;

/// Owns a subscription that copies matching events into a broadcast channel.
///
/// Dropping the bridge unsubscribes it. Receivers that fall more than
/// `capacity` events behind get `RecvError::Lagged`.
pub struct Bridge<K, P> {
    tx: broadcast::Sender<Event<K, P>>,
    rx: broadcast::Receiver<Event<K, P>>,
    subscription: SubscriptionGuard,
}

impl<K, P> EventBus<K, P>
where
    K: EventKind,
    P: Send + Sync + 'static,
{
    /// Opens a bridge for `kinds`. Capacity is clamped to at least 1.
    pub fn bridge<I>(&self, kinds: I, capacity: usize) -> Bridge<K, P>
    where
        I: IntoIterator<Item = K>,
    {
        let (tx, rx) = broadcast::channel(capacity.max(1));
        let forward = tx.clone();
        let subscription = self
            .subscribe_many(kinds, move |ev| {
                // no receivers left is fine; the event stays in history
                let _ = forward.send(ev.clone());
                Ok(())
            })
            .into_guard();
        Bridge {
            tx,
            rx,
            subscription,
        }
    }
}

impl<K, P> Bridge<K, P>
where
    K: EventKind,
    P: Send + Sync + 'static,
{
    pub async fn recv(&mut self) -> Result<Event<K, P>, broadcast::error::RecvError> {
        self.rx.recv().await
    }

    pub fn try_recv(&mut self) -> Result<Event<K, P>, broadcast::error::TryRecvError> {
        self.rx.try_recv()
    }

    /// Another independent receiver; sees only events forwarded from now on.
    pub fn receiver(&self) -> broadcast::Receiver<Event<K, P>> {
        self.tx.subscribe()
    }

    pub fn is_active(&self) -> bool {
        self.subscription.is_active()
    }

    /// Unsubscribes from the bus. Equivalent to dropping the bridge.
    pub fn close(self) {
        drop(self);
    }
}
