//! Futsal Log - Personal Activity Logging
//!
//! A local-first activity log for futsal players. Training sessions and
//! matches are recorded as activities on a calendar, with structured
//! reflections (KPT retrospectives, effort scores, goals/assists), optional
//! video with timestamped comments, a user-customizable activity-type
//! taxonomy, and monthly aggregate statistics. Everything persists to a
//! single local database; there is no server and no sync.

pub mod config;
pub mod model;
pub mod stats;
pub mod storage;

// Re-export commonly used types
pub use model::activity::{Activity, ActivityDraft, ActivityPatch};
pub use model::activity_type::CustomActivityType;
pub use stats::projector::{project, MonthlyStats, YearMonth};
pub use storage::activity_store::ActivityStore;
pub use storage::kv::KvStore;
pub use storage::settings_store::SettingsStore;
pub use storage::type_registry::ActivityTypeRegistry;
