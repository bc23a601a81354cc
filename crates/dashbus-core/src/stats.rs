use serde::Serialize;

/// Point-in-time counters for one bus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BusStats {
    /// Emits that were recorded and dispatched.
    pub total_emitted: u64,
    /// Successful callback invocations.
    pub total_delivered: u64,
    /// Callback invocations that returned `Err` or panicked.
    pub total_failed: u64,
    /// Nested emits dropped by the dispatch depth guard.
    pub total_suppressed: u64,
    /// Live registrations across all kinds.
    pub subscriptions: usize,
    pub history_length: usize,
    pub history_capacity: usize,
}

#[derive(Debug, Default)]
pub(crate) struct Counters {
    pub(crate) emitted: u64,
    pub(crate) delivered: u64,
    pub(crate) failed: u64,
    pub(crate) suppressed: u64,
}

/// Outcome of a single `emit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EmitReport {
    /// Sequence number assigned to the event; `None` when suppressed.
    pub seq: Option<u64>,
    pub delivered: usize,
    pub failed: usize,
    pub suppressed: bool,
}

impl EmitReport {
    pub(crate) fn suppressed() -> Self {
        Self {
            seq: None,
            delivered: 0,
            failed: 0,
            suppressed: true,
        }
    }

    /// Number of subscribers the event was handed to.
    pub fn attempted(&self) -> usize {
        self.delivered + self.failed
    }
}
