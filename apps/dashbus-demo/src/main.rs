use anyhow::Context;
use dashbus_core::{CoreConfig, EventKind};
use dashbus_dashboards::admin::{CategorySummary, EntityRef, StatusChange, UserRole, UserSummary};
use dashbus_dashboards::learner::{LearnerEvent, LearnerStats};
use dashbus_dashboards::{
    history_json, log_events, Buses, DashboardEvent, DashboardEventKind, LearnerEventKind,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::info;

fn load_config() -> anyhow::Result<CoreConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            CoreConfig::load(&path).with_context(|| format!("loading config from {path}"))
        }
        None => Ok(CoreConfig::default()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = load_config()?;
    dashbus_core::logging::init_logging(&cfg.logging);
    dashbus_core::logging::route_panics_to_tracing();

    let buses = Buses::from_config(&cfg)?;

    let _dashboard_log = log_events(&buses.dashboard, DashboardEventKind::ALL.iter().copied());
    let _learner_log = log_events(&buses.learner, LearnerEventKind::ALL.iter().copied());

    // admin dashboard widget counting users
    let user_count = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&user_count);
    let users_widget = buses.dashboard.subscribe_many(
        [DashboardEventKind::UserCreated, DashboardEventKind::UserDeleted],
        move |ev| {
            match ev.payload() {
                DashboardEvent::UserCreated(_) => {
                    counter.fetch_add(1, Ordering::SeqCst);
                }
                DashboardEvent::UserDeleted(_) => {
                    counter.fetch_sub(1, Ordering::SeqCst);
                }
                _ => {}
            }
            Ok(())
        },
    );

    // a flaky view; its failures are logged and do not reach the emitter
    let flaky = buses
        .dashboard
        .subscribe(DashboardEventKind::CategoryStatusChanged, |_| {
            anyhow::bail!("category list refetch failed")
        });

    let mut refresher = buses.dashboard.bridge([DashboardEventKind::DashboardRefreshNeeded], 16);
    let refresh_task = tokio::spawn(async move {
        match refresher.recv().await {
            Ok(ev) => info!(topic = ev.kind.as_str(), seq = ev.seq, "background refresh"),
            Err(err) => info!(error = %err, "refresh bridge closed"),
        }
    });

    buses.dashboard.publish(DashboardEvent::UserCreated(
        UserSummary::new("u1")
            .with_name("Ada")
            .with_role(UserRole::Learner),
    ));
    buses.dashboard.publish(DashboardEvent::UserCreated(UserSummary::new("u2")));
    buses
        .dashboard
        .publish(DashboardEvent::UserDeleted(EntityRef::new("u2")));
    buses
        .dashboard
        .publish(DashboardEvent::CategoryCreated(CategorySummary {
            id: "c1".into(),
            name: "Systems".into(),
        }));
    let report = buses
        .dashboard
        .publish(DashboardEvent::CategoryStatusChanged(StatusChange {
            id: "c1".into(),
            active: false,
        }));
    info!(delivered = report.delivered, failed = report.failed, "category status emitted");
    buses
        .dashboard
        .publish(DashboardEvent::DashboardRefreshNeeded(Default::default()));

    buses.learner.publish(LearnerEvent::StatsUpdated(LearnerStats {
        learner_id: "u1".into(),
        points: 40,
        ..LearnerStats::default()
    }));

    refresh_task.await?;

    users_widget.dispose();
    flaky.dispose();

    info!(users = user_count.load(Ordering::SeqCst), "admin widget state");
    info!(stats = %serde_json::to_string(&buses.dashboard.stats())?, "dashboard bus stats");
    println!("{}", history_json(&buses.dashboard)?);
    Ok(())
}
