//! Storage module: durable key-value persistence and the stores built on it.

pub mod activity_store;
pub mod kv;
pub mod schema;
pub mod settings_store;
pub mod type_registry;

pub use activity_store::{ActivityStore, ActivityStoreError, ACTIVITIES_KEY};
pub use kv::{KvError, KvStore};
pub use settings_store::{
    NotificationSettings, SettingsStore, Theme, UserSettings, SETTINGS_KEY, THEME_KEY,
};
pub use type_registry::{ActivityTypeRegistry, TypeRegistryError, CUSTOM_TYPES_KEY};
