use crate::admin::{DashboardEvent, DashboardEventKind};
use crate::learner::{LearnerEvent, LearnerEventKind};
use dashbus_core::{CoreConfig, CoreResult, EventBus};

pub type DashboardBus = EventBus<DashboardEventKind, DashboardEvent>;
pub type LearnerBus = EventBus<LearnerEventKind, LearnerEvent>;

/// The application's event buses, built once at start-up and cloned into
/// every screen or hook that emits or listens.
#[derive(Debug, Clone)]
pub struct Buses {
    pub dashboard: DashboardBus,
    pub learner: LearnerBus,
}

impl Buses {
    pub fn from_config(cfg: &CoreConfig) -> CoreResult<Self> {
        cfg.validate()?;
        tracing::info!(
            history_capacity = cfg.bus.history_capacity,
            max_dispatch_depth = ?cfg.bus.max_dispatch_depth,
            "creating dashboard buses"
        );
        Ok(Self {
            dashboard: DashboardBus::new(&cfg.bus),
            learner: LearnerBus::new(&cfg.bus),
        })
    }

    /// Drops every subscription on both buses; history is kept.
    pub fn clear_all(&self) {
        self.dashboard.clear_all();
        self.learner.clear_all();
    }
}

impl Default for Buses {
    fn default() -> Self {
        Self {
            dashboard: DashboardBus::default(),
            learner: LearnerBus::default(),
        }
    }
}
