use crate::registry::SubscriptionId;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Weak;

/// Registry operations a handle needs, without knowing the bus's types.
pub(crate) trait Detach: Send + Sync {
    fn detach(&self, id: SubscriptionId);
    fn is_registered(&self, id: SubscriptionId) -> bool;
}

/// Disposer returned by `subscribe`/`subscribe_many`.
///
/// Dropping the handle does **not** unsubscribe; call [`Subscription::dispose`]
/// or convert it with [`Subscription::into_guard`].
#[must_use = "dropping a Subscription leaves the callback registered; call dispose() or into_guard()"]
pub struct Subscription {
    id: SubscriptionId,
    bus: Weak<dyn Detach>,
    active: AtomicBool,
}

impl Subscription {
    pub(crate) fn new(id: SubscriptionId, bus: Weak<dyn Detach>) -> Self {
        Self {
            id,
            bus,
            active: AtomicBool::new(true),
        }
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Removes every registration made by this call. Safe to call repeatedly.
    pub fn dispose(&self) {
        if !self.active.swap(false, Ordering::AcqRel) {
            return;
        }
        if let Some(bus) = self.bus.upgrade() {
            bus.detach(self.id);
        }
    }

    /// False after `dispose`, after `clear_all`, or once the bus is gone.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
            && self
                .bus
                .upgrade()
                .is_some_and(|bus| bus.is_registered(self.id))
    }

    pub fn into_guard(self) -> SubscriptionGuard {
        SubscriptionGuard { inner: self }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.active.load(Ordering::Acquire))
            .finish()
    }
}

/// Disposes its subscription when dropped.
#[derive(Debug)]
pub struct SubscriptionGuard {
    inner: Subscription,
}

impl SubscriptionGuard {
    pub fn id(&self) -> SubscriptionId {
        self.inner.id()
    }

    pub fn is_active(&self) -> bool {
        self.inner.is_active()
    }
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        self.inner.dispose();
    }
}
