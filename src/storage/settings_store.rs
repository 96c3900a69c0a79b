//! User settings and theme persistence.
//!
//! The settings screen owns these documents; the store just gives them
//! durable load/save over the shared key-value backend. Nothing else in the
//! data layer reads them.

use crate::storage::kv::{KvError, KvStore};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

/// Storage key holding the user settings blob.
pub const SETTINGS_KEY: &str = "settings";

/// Storage key holding the theme preference string.
pub const THEME_KEY: &str = "theme";

/// UI theme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    /// Follow the platform theme (default).
    #[default]
    System,
}

impl Theme {
    /// The stored wire form: a bare string, not a JSON document.
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        }
    }

    fn parse(value: &str) -> Option<Theme> {
        match value {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            "system" => Some(Theme::System),
            _ => None,
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Notification toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    pub match_reminders: bool,
    pub training_reminders: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            match_reminders: true,
            training_reminders: true,
        }
    }
}

/// User profile fields owned by the settings screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserSettings {
    pub nickname: String,
    pub team: Option<String>,
    /// Reference to an avatar image resource; resolution is the renderer's job.
    pub avatar: Option<String>,
    pub notifications: NotificationSettings,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            nickname: "Futsal Player".to_string(),
            team: None,
            avatar: None,
            notifications: NotificationSettings::default(),
        }
    }
}

/// Durable store for user settings and theme preference.
pub struct SettingsStore {
    kv: Arc<Mutex<KvStore>>,
}

impl SettingsStore {
    pub fn new(kv: Arc<Mutex<KvStore>>) -> Self {
        Self { kv }
    }

    /// Load the settings blob, falling back to defaults when absent or
    /// unreadable.
    pub fn load_settings(&self) -> UserSettings {
        let backend = self.kv.lock().unwrap();
        match backend.get(SETTINGS_KEY) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(settings) => settings,
                Err(e) => {
                    tracing::error!("Stored settings are unreadable, using defaults: {e}");
                    UserSettings::default()
                }
            },
            Ok(None) => UserSettings::default(),
            Err(e) => {
                tracing::error!("Failed to read settings from storage, using defaults: {e}");
                UserSettings::default()
            }
        }
    }

    /// Persist the settings blob.
    pub fn save_settings(&self, settings: &UserSettings) -> Result<(), KvError> {
        let json =
            serde_json::to_string(settings).map_err(|e| KvError::Serialization(e.to_string()))?;
        self.kv.lock().unwrap().set(SETTINGS_KEY, &json)
    }

    /// Load the theme preference, defaulting to `System` for anything absent
    /// or unrecognized.
    pub fn load_theme(&self) -> Theme {
        let backend = self.kv.lock().unwrap();
        match backend.get(THEME_KEY) {
            Ok(Some(value)) => Theme::parse(&value).unwrap_or_else(|| {
                tracing::warn!("Unrecognized theme {value:?}, using default");
                Theme::default()
            }),
            Ok(None) => Theme::default(),
            Err(e) => {
                tracing::error!("Failed to read theme from storage, using default: {e}");
                Theme::default()
            }
        }
    }

    /// Persist the theme preference as a bare string.
    pub fn save_theme(&self, theme: Theme) -> Result<(), KvError> {
        self.kv.lock().unwrap().set(THEME_KEY, theme.as_str())
    }
}
