//! Synchronous, process-local event bus.
//!
//! [`EventBus`] keeps a registry of callbacks per event kind, dispatches each
//! emitted event to the callbacks of its kind on the caller's thread, and
//! records every event in a bounded [`HistoryBuffer`].
//!
//! ## Rules
//! - Delivery order for a kind is registration order.
//! - Subscribers are snapshotted when an emit starts; changes made during the
//!   dispatch apply to later emits.
//! - A callback that returns `Err` or panics is logged and counted. Delivery
//!   continues and the emitter never sees the failure.
//! - The state lock is never held while a callback runs, so callbacks may
//!   subscribe, dispose or emit again. Nested emits run depth-first and are
//!   bounded by `BusConfig::max_dispatch_depth`.
//! - A panicking callback still goes through the process panic hook, which by
//!   default prints to stderr. Apps that want panics only in their logs call
//!   [`route_panics_to_tracing`](crate::logging::route_panics_to_tracing).

use crate::config::BusConfig;
use crate::event::{Event, EventKind, Tagged};
use crate::history::HistoryBuffer;
use crate::registry::{Callback, Registry, SubscriptionId};
use crate::stats::{BusStats, Counters, EmitReport};
use crate::subscription::{Detach, Subscription};
use std::any::Any;
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use tracing::{debug, trace, warn};

thread_local! {
    /// Emits currently in progress on this thread, across all buses.
    static DISPATCH_DEPTH: Cell<usize> = const { Cell::new(0) };
}

struct DepthGuard;

impl DepthGuard {
    /// Returns `None` when this emit would nest deeper than `max`.
    fn enter(max: Option<usize>) -> Option<Self> {
        DISPATCH_DEPTH.with(|depth| {
            let current = depth.get();
            if max.is_some_and(|max| current > max) {
                return None;
            }
            depth.set(current + 1);
            Some(DepthGuard)
        })
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        DISPATCH_DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

struct BusState<K, P> {
    registry: Registry<K, P>,
    history: HistoryBuffer<K, P>,
    counters: Counters,
    next_seq: u64,
    next_id: u64,
}

struct BusInner<K, P> {
    state: Mutex<BusState<K, P>>,
    max_dispatch_depth: Option<usize>,
}

impl<K, P> BusInner<K, P> {
    fn lock(&self) -> MutexGuard<'_, BusState<K, P>> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!("event bus state lock poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }
}

impl<K, P> Detach for BusInner<K, P>
where
    K: EventKind,
    P: Send + Sync + 'static,
{
    fn detach(&self, id: SubscriptionId) {
        let removed = self.lock().registry.remove(id);
        debug!(subscription = %id, removed, "unsubscribed");
    }

    fn is_registered(&self, id: SubscriptionId) -> bool {
        self.lock().registry.contains(id)
    }
}

/// Handle to one event bus. Clones share the same registry and history.
pub struct EventBus<K, P> {
    inner: Arc<BusInner<K, P>>,
}

impl<K, P> Clone for EventBus<K, P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, P> Default for EventBus<K, P>
where
    K: EventKind,
    P: Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new(&BusConfig::default())
    }
}

impl<K, P> EventBus<K, P>
where
    K: EventKind,
    P: Send + Sync + 'static,
{
    pub fn new(cfg: &BusConfig) -> Self {
        let state = BusState {
            registry: Registry::new(),
            history: HistoryBuffer::new(cfg.history_capacity),
            counters: Counters::default(),
            next_seq: 0,
            next_id: 0,
        };
        Self {
            inner: Arc::new(BusInner {
                state: Mutex::new(state),
                max_dispatch_depth: cfg.max_dispatch_depth,
            }),
        }
    }

    /// Bus with the default depth guard and the given history capacity.
    pub fn with_history_capacity(capacity: usize) -> Self {
        Self::new(&BusConfig {
            history_capacity: capacity,
            ..BusConfig::default()
        })
    }

    /// Registers `callback` for `kind`.
    ///
    /// Every call creates a separate registration, even for the same callback.
    pub fn subscribe<F>(&self, kind: K, callback: F) -> Subscription
    where
        F: Fn(&Event<K, P>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.register(std::iter::once(kind), Arc::new(callback))
    }

    /// Registers one callback for several kinds behind a single disposer.
    pub fn subscribe_many<I, F>(&self, kinds: I, callback: F) -> Subscription
    where
        I: IntoIterator<Item = K>,
        F: Fn(&Event<K, P>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.register(kinds, Arc::new(callback))
    }

    fn register<I>(&self, kinds: I, callback: Callback<K, P>) -> Subscription
    where
        I: IntoIterator<Item = K>,
    {
        let id = {
            let mut state = self.inner.lock();
            let id = SubscriptionId::new(state.next_id);
            state.next_id += 1;
            for kind in kinds {
                trace!(subscription = %id, kind = kind.as_str(), "subscribing");
                state.registry.insert(kind, id, Arc::clone(&callback));
            }
            id
        };
        debug!(subscription = %id, "subscribed");
        let weak: Weak<BusInner<K, P>> = Arc::downgrade(&self.inner);
        let weak: Weak<dyn Detach> = weak;
        Subscription::new(id, weak)
    }

    /// Records an event of `kind` and delivers it to the current subscribers.
    ///
    /// `kind` is not checked against the payload. With tagged payloads prefer
    /// [`EventBus::publish`], which takes the kind from the payload itself.
    ///
    /// Never fails: subscriber errors and panics are caught, logged and
    /// reported in the returned [`EmitReport`].
    pub fn emit(&self, kind: K, payload: P) -> EmitReport {
        let Some(_depth) = DepthGuard::enter(self.inner.max_dispatch_depth) else {
            self.inner.lock().counters.suppressed += 1;
            warn!(
                kind = kind.as_str(),
                max_depth = ?self.inner.max_dispatch_depth,
                "nested emit exceeds dispatch depth, dropping event"
            );
            return EmitReport::suppressed();
        };

        let (event, targets) = {
            let mut state = self.inner.lock();
            let seq = state.next_seq;
            state.next_seq += 1;
            state.counters.emitted += 1;
            let event = Event::new(seq, kind, payload);
            state.history.record(event.clone());
            let targets = state.registry.snapshot(&kind);
            (event, targets)
        };

        trace!(
            kind = kind.as_str(),
            seq = event.seq,
            subscribers = targets.len(),
            "dispatching event"
        );

        let mut delivered = 0;
        let mut failed = 0;
        for (id, callback) in targets {
            match panic::catch_unwind(AssertUnwindSafe(|| callback(&event))) {
                Ok(Ok(())) => delivered += 1,
                Ok(Err(err)) => {
                    failed += 1;
                    warn!(
                        kind = kind.as_str(),
                        subscription = %id,
                        error = %format!("{err:#}"),
                        "subscriber failed"
                    );
                }
                Err(panic_err) => {
                    failed += 1;
                    warn!(
                        kind = kind.as_str(),
                        subscription = %id,
                        panic = %panic_message(panic_err.as_ref()),
                        "subscriber panicked"
                    );
                }
            }
        }

        {
            let mut state = self.inner.lock();
            state.counters.delivered += delivered as u64;
            state.counters.failed += failed as u64;
        }

        EmitReport {
            seq: Some(event.seq),
            delivered,
            failed,
            suppressed: false,
        }
    }

    /// Emits a tagged payload under its own kind.
    pub fn publish(&self, payload: P) -> EmitReport
    where
        P: Tagged<Kind = K>,
    {
        let kind = payload.kind();
        self.emit(kind, payload)
    }

    /// Drops every subscription of every kind. History is kept.
    pub fn clear_all(&self) {
        let removed = {
            let mut state = self.inner.lock();
            let removed = state.registry.len();
            state.registry.clear();
            removed
        };
        debug!(removed, "cleared all subscriptions");
    }

    /// Snapshot of retained events, oldest first, optionally for one kind.
    pub fn recent(&self, kind: Option<K>) -> Vec<Event<K, P>> {
        self.inner.lock().history.recent(kind)
    }

    /// Last `limit` retained events, oldest first.
    pub fn latest(&self, limit: usize) -> Vec<Event<K, P>> {
        self.inner.lock().history.latest(limit)
    }

    pub fn clear_history(&self) {
        self.inner.lock().history.clear();
    }

    pub fn subscriber_count(&self, kind: K) -> usize {
        self.inner.lock().registry.count(&kind)
    }

    /// True when no kind has a subscriber.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().registry.len() == 0
    }

    pub fn stats(&self) -> BusStats {
        let state = self.inner.lock();
        BusStats {
            total_emitted: state.counters.emitted,
            total_delivered: state.counters.delivered,
            total_failed: state.counters.failed,
            total_suppressed: state.counters.suppressed,
            subscriptions: state.registry.len(),
            history_length: state.history.len(),
            history_capacity: state.history.capacity(),
        }
    }
}

impl<K, P> std::fmt::Debug for EventBus<K, P>
where
    K: EventKind,
    P: Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("stats", &self.stats())
            .finish()
    }
}

pub(crate) fn panic_message(panic_err: &(dyn Any + Send)) -> String {
    if let Some(s) = panic_err.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic_err.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    type TestBus = EventBus<&'static str, u32>;

    fn recorder() -> Arc<Mutex<Vec<String>>> {
        Arc::new(Mutex::new(Vec::new()))
    }

    #[test]
    fn delivers_in_registration_order_exactly_once() {
        let bus = TestBus::default();
        let log = recorder();
        let mut subs = Vec::new();
        for name in ["s1", "s2", "s3", "s4"] {
            let sink = Arc::clone(&log);
            subs.push(bus.subscribe("k", move |ev| {
                sink.lock().unwrap().push(format!("{name}:{}", ev.payload()));
                Ok(())
            }));
        }

        let report = bus.emit("k", 9);

        assert_eq!(*log.lock().unwrap(), vec!["s1:9", "s2:9", "s3:9", "s4:9"]);
        assert_eq!(report.delivered, 4);
        assert_eq!(report.failed, 0);
        assert_eq!(report.seq, Some(0));
    }

    #[test]
    fn failing_subscribers_do_not_stop_delivery() {
        let bus = TestBus::default();
        let hits = Arc::new(AtomicUsize::new(0));

        let h = Arc::clone(&hits);
        let _a = bus.subscribe("k", move |_| {
            h.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        let _b = bus.subscribe("k", |_| anyhow::bail!("refetch failed"));
        let _c = bus.subscribe("k", |_| panic!("boom"));
        let h = Arc::clone(&hits);
        let _d = bus.subscribe("k", move |_| {
            h.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        let report = bus.emit("k", 1);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
        assert_eq!(report.delivered, 2);
        assert_eq!(report.failed, 2);
        assert_eq!(report.attempted(), 4);

        // failing subscriptions stay registered
        assert_eq!(bus.subscriber_count("k"), 4);
        let report = bus.emit("k", 2);
        assert_eq!(report.failed, 2);
        assert_eq!(hits.load(Ordering::SeqCst), 4);
        assert_eq!(bus.stats().total_failed, 4);
    }

    #[derive(Debug)]
    enum Ping {
        A(u32),
        B(u32),
    }

    impl Tagged for Ping {
        type Kind = &'static str;

        fn kind(&self) -> &'static str {
            match self {
                Ping::A(_) => "a",
                Ping::B(_) => "b",
            }
        }
    }

    #[test]
    fn publish_routes_by_payload_kind() {
        let bus: EventBus<&'static str, Ping> = EventBus::default();
        let seen = recorder();
        let s = Arc::clone(&seen);
        let _sub = bus.subscribe("b", move |ev| {
            s.lock().unwrap().push(format!("{:?}", ev.payload()));
            Ok(())
        });

        assert_eq!(bus.publish(Ping::A(1)).delivered, 0);
        assert_eq!(bus.publish(Ping::B(2)).delivered, 1);
        assert_eq!(*seen.lock().unwrap(), vec!["B(2)"]);
        let kinds: Vec<&str> = bus.recent(None).iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec!["a", "b"]);
    }

    #[test]
    fn kinds_are_isolated() {
        let bus = TestBus::default();
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        let _sub = bus.subscribe("a", move |_| {
            h.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        let report = bus.emit("b", 1);
        assert_eq!(report.attempted(), 0);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        // unknown kinds are still recorded
        assert_eq!(bus.recent(Some("b")).len(), 1);
    }

    #[test]
    fn dispose_is_idempotent() {
        let bus = TestBus::default();
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        let sub = bus.subscribe("k", move |_| {
            h.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        let other = bus.subscribe("k", |_| Ok(()));

        assert!(sub.is_active());
        sub.dispose();
        sub.dispose();
        assert!(!sub.is_active());
        assert!(other.is_active());
        assert_eq!(bus.subscriber_count("k"), 1);

        bus.emit("k", 1);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn duplicate_subscriptions_are_independent() {
        let bus = TestBus::default();
        let hits = Arc::new(AtomicUsize::new(0));
        let make = |hits: Arc<AtomicUsize>| {
            move |_: &Event<&'static str, u32>| -> anyhow::Result<()> {
                hits.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        };
        let first = bus.subscribe("k", make(Arc::clone(&hits)));
        let _second = bus.subscribe("k", make(Arc::clone(&hits)));

        bus.emit("k", 1);
        assert_eq!(hits.load(Ordering::SeqCst), 2);

        first.dispose();
        bus.emit("k", 2);
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn subscribe_many_disposes_every_kind() {
        let bus = TestBus::default();
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        let sub = bus.subscribe_many(["a", "b"], move |_| {
            h.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        bus.emit("a", 1);
        bus.emit("b", 2);
        assert_eq!(hits.load(Ordering::SeqCst), 2);

        sub.dispose();
        bus.emit("a", 3);
        bus.emit("b", 4);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
        assert!(bus.is_empty());
    }

    #[test]
    fn repeated_kind_in_subscribe_many_delivers_per_entry() {
        let bus = TestBus::default();
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        let sub = bus.subscribe_many(["a", "a"], move |_| {
            h.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        assert_eq!(bus.subscriber_count("a"), 2);

        let report = bus.emit("a", 1);
        assert_eq!(report.delivered, 2);
        assert_eq!(hits.load(Ordering::SeqCst), 2);

        sub.dispose();
        assert_eq!(bus.subscriber_count("a"), 0);
        bus.emit("a", 2);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn history_is_bounded_and_ordered() {
        let bus = TestBus::with_history_capacity(50);
        for i in 1..=60 {
            bus.emit("k", i);
        }
        let recent = bus.recent(None);
        assert_eq!(recent.len(), 50);
        assert_eq!(*recent.first().unwrap().payload(), 11);
        assert_eq!(*recent.last().unwrap().payload(), 60);
        assert!(recent.windows(2).all(|w| w[0].seq < w[1].seq));
    }

    #[test]
    fn recent_returns_detached_snapshot() {
        let bus = TestBus::default();
        bus.emit("k", 1);
        bus.emit("k", 2);
        let mut snapshot = bus.recent(None);
        snapshot.pop();
        snapshot.clear();
        assert_eq!(bus.recent(None).len(), 2);
    }

    #[test]
    fn clear_all_keeps_history() {
        let bus = TestBus::default();
        let sub = bus.subscribe("k", |_| Ok(()));
        bus.emit("k", 1);

        bus.clear_all();
        assert!(bus.is_empty());
        assert!(!sub.is_active());
        sub.dispose();
        assert_eq!(bus.recent(None).len(), 1);

        bus.clear_history();
        assert!(bus.recent(None).is_empty());
    }

    #[test]
    fn dispose_during_dispatch_applies_to_next_emit() {
        let bus = TestBus::default();
        let hits = Arc::new(AtomicUsize::new(0));
        let later: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));

        let slot = Arc::clone(&later);
        let _first = bus.subscribe("k", move |_| {
            if let Some(sub) = slot.lock().unwrap().as_ref() {
                sub.dispose();
            }
            Ok(())
        });
        let h = Arc::clone(&hits);
        *later.lock().unwrap() = Some(bus.subscribe("k", move |_| {
            h.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }));

        // second subscriber was in the snapshot, so it still runs once
        bus.emit("k", 1);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        bus.emit("k", 2);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn subscribe_during_dispatch_waits_for_next_emit() {
        let bus = TestBus::default();
        let hits = Arc::new(AtomicUsize::new(0));
        let added = Arc::new(Mutex::new(Vec::new()));

        let inner_bus = bus.clone();
        let h = Arc::clone(&hits);
        let store = Arc::clone(&added);
        let _sub = bus.subscribe("k", move |_| {
            let h = Arc::clone(&h);
            store.lock().unwrap().push(inner_bus.subscribe("k", move |_| {
                h.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }));
            Ok(())
        });

        bus.emit("k", 1);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        bus.emit("k", 2);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn nested_emit_runs_depth_first() {
        let bus = TestBus::default();
        let log = recorder();

        let inner_bus = bus.clone();
        let out = Arc::clone(&log);
        let _outer = bus.subscribe("outer", move |_| {
            out.lock().unwrap().push("outer-start".to_string());
            inner_bus.emit("inner", 0);
            out.lock().unwrap().push("outer-end".to_string());
            Ok(())
        });
        let inn = Arc::clone(&log);
        let _inner = bus.subscribe("inner", move |_| {
            inn.lock().unwrap().push("inner".to_string());
            Ok(())
        });

        bus.emit("outer", 0);
        assert_eq!(*log.lock().unwrap(), vec!["outer-start", "inner", "outer-end"]);
        let kinds: Vec<&str> = bus.recent(None).iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec!["outer", "inner"]);
    }

    #[test]
    fn runaway_recursion_is_suppressed() {
        let bus = TestBus::new(&BusConfig {
            history_capacity: 100,
            max_dispatch_depth: Some(3),
        });
        let calls = Arc::new(AtomicUsize::new(0));
        let inner_bus = bus.clone();
        let c = Arc::clone(&calls);
        let _sub = bus.subscribe("loop", move |ev| {
            c.fetch_add(1, Ordering::SeqCst);
            inner_bus.emit("loop", ev.payload() + 1);
            Ok(())
        });

        let report = bus.emit("loop", 0);
        assert!(!report.suppressed);
        // top level plus three nested levels
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert_eq!(bus.recent(None).len(), 4);
        assert_eq!(bus.stats().total_suppressed, 1);

        // depth counter unwinds after the outer emit
        bus.clear_all();
        assert!(!bus.emit("loop", 0).suppressed);
    }

    #[test]
    fn unguarded_bus_allows_deep_recursion() {
        let bus = TestBus::new(&BusConfig {
            history_capacity: 200,
            max_dispatch_depth: None,
        });
        let calls = Arc::new(AtomicUsize::new(0));
        let inner_bus = bus.clone();
        let c = Arc::clone(&calls);
        let _sub = bus.subscribe("loop", move |ev| {
            c.fetch_add(1, Ordering::SeqCst);
            if *ev.payload() < 100 {
                inner_bus.emit("loop", ev.payload() + 1);
            }
            Ok(())
        });

        let report = bus.emit("loop", 0);
        assert!(!report.suppressed);
        assert_eq!(calls.load(Ordering::SeqCst), 101);

        let payloads: Vec<u32> = bus.recent(None).iter().map(|e| *e.payload()).collect();
        assert_eq!(payloads, (0..=100).collect::<Vec<_>>());
        let stats = bus.stats();
        assert_eq!(stats.total_suppressed, 0);
        assert_eq!(stats.total_delivered, 101);
    }

    #[test]
    fn depth_is_shared_across_buses() {
        let outer = TestBus::new(&BusConfig {
            history_capacity: 10,
            max_dispatch_depth: Some(0),
        });
        let other = TestBus::default();
        let reports = Arc::new(Mutex::new(Vec::new()));
        let target = other.clone();
        let store = Arc::clone(&reports);
        let _sub = outer.subscribe("a", move |_| {
            store.lock().unwrap().push(target.emit("b", 0));
            Ok(())
        });

        outer.emit("a", 0);
        // other bus allows 32 levels, so its emit nested at depth 1 goes through
        assert!(!reports.lock().unwrap()[0].suppressed);
        assert_eq!(other.recent(None).len(), 1);

        let strict = TestBus::new(&BusConfig {
            history_capacity: 10,
            max_dispatch_depth: Some(0),
        });
        let target = strict.clone();
        let _sub2 = other.subscribe("c", move |_| {
            target.emit("d", 0);
            Ok(())
        });
        other.emit("c", 0);
        assert!(strict.recent(None).is_empty());
        assert_eq!(strict.stats().total_suppressed, 1);
    }

    #[test]
    fn zero_depth_forbids_nested_emits() {
        let bus = TestBus::new(&BusConfig {
            history_capacity: 10,
            max_dispatch_depth: Some(0),
        });
        let reports = Arc::new(Mutex::new(Vec::new()));
        let inner_bus = bus.clone();
        let store = Arc::clone(&reports);
        let _sub = bus.subscribe("a", move |_| {
            store.lock().unwrap().push(inner_bus.emit("b", 0));
            Ok(())
        });

        let report = bus.emit("a", 0);
        assert_eq!(report.delivered, 1);
        assert!(reports.lock().unwrap()[0].suppressed);
        assert!(bus.recent(Some("b")).is_empty());
    }

    #[test]
    fn stats_track_activity() {
        let bus = TestBus::with_history_capacity(2);
        let _ok = bus.subscribe("k", |_| Ok(()));
        let _bad = bus.subscribe_many(["k", "j"], |_| anyhow::bail!("nope"));
        for i in 0..3 {
            bus.emit("k", i);
        }

        let stats = bus.stats();
        assert_eq!(stats.total_emitted, 3);
        assert_eq!(stats.total_delivered, 3);
        assert_eq!(stats.total_failed, 3);
        assert_eq!(stats.subscriptions, 3);
        assert_eq!(stats.history_length, 2);
        assert_eq!(stats.history_capacity, 2);
    }

    #[test]
    fn handle_outlives_bus() {
        let bus = TestBus::default();
        let sub = bus.subscribe("k", |_| Ok(()));
        drop(bus);
        assert!(!sub.is_active());
        sub.dispose();
    }

    #[test]
    fn guard_disposes_on_drop() {
        let bus = TestBus::default();
        {
            let guard = bus.subscribe("k", |_| Ok(())).into_guard();
            assert!(guard.is_active());
            assert_eq!(bus.subscriber_count("k"), 1);
        }
        assert_eq!(bus.subscriber_count("k"), 0);
    }

    #[test]
    fn latest_limits_tail() {
        let bus = TestBus::default();
        for i in 0..5 {
            bus.emit("k", i);
        }
        let tail: Vec<u32> = bus.latest(2).iter().map(|e| *e.payload()).collect();
        assert_eq!(tail, vec![3, 4]);
    }

    #[test]
    fn panic_message_extracts_strings() {
        let err = panic::catch_unwind(|| panic!("static message")).unwrap_err();
        assert_eq!(panic_message(err.as_ref()), "static message");
        let err = panic::catch_unwind(|| panic!("formatted {}", 7)).unwrap_err();
        assert_eq!(panic_message(err.as_ref()), "formatted 7");
    }
}
