//! Futsal Log - Personal Activity Logging
//!
//! Main entry point: wires the stores up once and prints the current month's
//! summary. The stores are constructed here and passed down explicitly; no
//! screen reaches for ambient global state.

use std::sync::{Arc, Mutex};

use anyhow::Context;
use chrono::Utc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use futsal_log::config;
use futsal_log::model::activity_type::resolve_type_label;
use futsal_log::stats::projector::{project, YearMonth};
use futsal_log::storage::activity_store::ActivityStore;
use futsal_log::storage::kv::KvStore;
use futsal_log::storage::settings_store::SettingsStore;
use futsal_log::storage::type_registry::ActivityTypeRegistry;

fn main() -> anyhow::Result<()> {
    let app_config = config::load_config().unwrap_or_else(|e| {
        eprintln!("Unreadable config file, using defaults: {e}");
        config::AppConfig::default()
    });

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(app_config.log_filter.clone())),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Futsal Log v{}", env!("CARGO_PKG_VERSION"));

    let db_path = app_config.database_path();
    let kv = Arc::new(Mutex::new(
        KvStore::open(&db_path)
            .with_context(|| format!("opening database at {}", db_path.display()))?,
    ));

    let activities = ActivityStore::new(Arc::clone(&kv));
    let registry = ActivityTypeRegistry::new(Arc::clone(&kv));
    let settings = SettingsStore::new(Arc::clone(&kv));

    let profile = settings.load_settings();
    let month = YearMonth::from_date(Utc::now().date_naive());
    let list = activities.list();
    let types = registry.list();
    let stats = project(&list, month, &types);

    println!("Futsal Log — {} ({})", profile.nickname, month);
    println!(
        "  {} activities: {} training, {} matches",
        stats.total_activities, stats.training_count, stats.match_count
    );
    println!(
        "  {}G {}A, {}W {}D {}L (win rate {}%), avg effort {:.1}",
        stats.total_goals,
        stats.total_assists,
        stats.wins,
        stats.draws,
        stats.losses,
        stats.win_rate,
        stats.avg_effort_score
    );

    let mut this_month: Vec<_> = list.iter().filter(|a| month.contains(a.date)).collect();
    this_month.sort_by_key(|a| a.date);
    for activity in this_month {
        println!(
            "  {}  {}  [{}]",
            activity.date,
            activity.title,
            resolve_type_label(&types, &activity.activity_type)
        );
    }

    Ok(())
}
