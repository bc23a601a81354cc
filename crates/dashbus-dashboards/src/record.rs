use dashbus_core::{CoreResult, Event, EventBus, EventKind};
use serde::{Deserialize, Serialize};

/// JSON-friendly copy of a retained event, for diagnostics dumps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub topic: String,
    pub seq: u64,
    pub timestamp_ms: u64,
    pub payload: serde_json::Value,
}

impl EventRecord {
    pub fn from_event<K, P>(event: &Event<K, P>) -> CoreResult<Self>
    where
        K: EventKind,
        P: Serialize,
    {
        Ok(Self {
            topic: event.topic().to_string(),
            seq: event.seq,
            timestamp_ms: event.timestamp_ms,
            payload: serde_json::to_value(event.payload())?,
        })
    }
}

/// Retained history of `bus`, oldest first, optionally for one kind.
pub fn export_history<K, P>(bus: &EventBus<K, P>, kind: Option<K>) -> CoreResult<Vec<EventRecord>>
where
    K: EventKind,
    P: Serialize + Send + Sync + 'static,
{
    bus.recent(kind).iter().map(EventRecord::from_event).collect()
}

pub fn history_json<K, P>(bus: &EventBus<K, P>) -> CoreResult<String>
where
    K: EventKind,
    P: Serialize + Send + Sync + 'static,
{
    let records = export_history(bus, None)?;
    Ok(serde_json::to_string_pretty(&records)?)
}
