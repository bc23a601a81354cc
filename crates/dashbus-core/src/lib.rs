pub mod bridge;
pub mod bus;
pub mod config;
pub mod error;
pub mod event;
pub mod history;
pub mod logging;
pub mod registry;
pub mod stats;
pub mod subscription;

pub use bridge::Bridge;
pub use bus::EventBus;
pub use config::{BusConfig, CoreConfig, LoggingConfig};
pub use error::{CoreError, CoreResult};
pub use event::{Event, EventKind, Tagged};
pub use history::HistoryBuffer;
pub use registry::{Callback, SubscriptionId};
pub use stats::{BusStats, EmitReport};
pub use subscription::{Subscription, SubscriptionGuard};
