use crate::bus::panic_message;
use crate::config::LoggingConfig;
use std::panic;
use tracing_subscriber::{fmt, EnvFilter};

pub fn init_logging(cfg: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cfg.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}

/// Replaces the process panic hook with one that reports through `tracing`.
///
/// Subscriber panics are already caught and logged by the bus; without this the
/// default hook also prints each one to stderr. Process-wide, so only apps
/// should call it.
pub fn route_panics_to_tracing() {
    panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_default();
        tracing::error!(panic = %panic_message(info.payload()), %location, "panic");
    }));
}
