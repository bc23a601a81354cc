use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_HISTORY_CAPACITY: usize = 50;
pub const DEFAULT_MAX_DISPATCH_DEPTH: usize = 32;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct CoreConfig {
    pub bus: BusConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BusConfig {
    /// Number of events retained for `recent()`.
    pub history_capacity: usize,
    /// Deepest allowed nesting of emits made from inside a subscriber.
    /// `Some(0)` forbids re-entrant emits, `None` leaves them unguarded.
    ///
    /// Nesting is counted per thread across every bus. An emit on this bus made
    /// from inside a subscriber of any other bus counts that outer dispatch, so
    /// with `Some(0)` it is dropped.
    pub max_dispatch_depth: Option<usize>,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            max_dispatch_depth: Some(DEFAULT_MAX_DISPATCH_DEPTH),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

impl CoreConfig {
    pub fn load(path: impl AsRef<Path>) -> CoreResult<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&data)
    }

    pub fn from_json_str(data: &str) -> CoreResult<Self> {
        let cfg: CoreConfig = serde_json::from_str(data)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.bus.history_capacity == 0 {
            return Err(CoreError::Config(
                "bus.history_capacity must be at least 1".to_string(),
            ));
        }
        if self.logging.filter.trim().is_empty() {
            return Err(CoreError::Config("logging.filter is empty".to_string()));
        }
        Ok(())
    }
}
