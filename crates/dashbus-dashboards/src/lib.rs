mod kinds;

pub mod admin;
pub mod buses;
pub mod learner;
pub mod log;
pub mod record;

pub use admin::{DashboardEvent, DashboardEventKind};
pub use buses::{Buses, DashboardBus, LearnerBus};
pub use learner::{LearnerEvent, LearnerEventKind};
pub use log::log_events;
pub use record::{export_history, history_json, EventRecord};
