//! Registry for the user-customizable activity-type taxonomy.
//!
//! Six built-in types are seeded by default and protected from deletion;
//! user-created types come and go freely. Deleting a type never cascades to
//! the activities referencing it — renderers resolve the dangling reference
//! with a generic fallback label instead.

use crate::model::activity_type::{
    builtin_types, is_builtin_type, ActivityTypeDraft, ActivityTypePatch, CustomActivityType,
};
use crate::storage::kv::{KvError, KvStore};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use uuid::Uuid;

/// Storage key holding the type taxonomy.
pub const CUSTOM_TYPES_KEY: &str = "custom_types";

/// Durable store for the activity-type taxonomy.
pub struct ActivityTypeRegistry {
    kv: Arc<Mutex<KvStore>>,
    types: Mutex<Vec<CustomActivityType>>,
}

impl ActivityTypeRegistry {
    /// Open the registry over the given key-value backend, seeding the six
    /// built-in types when storage is empty or corrupt.
    pub fn new(kv: Arc<Mutex<KvStore>>) -> Self {
        let types = {
            let backend = kv.lock().unwrap();
            load_or_seed(&backend)
        };

        Self {
            kv,
            types: Mutex::new(types),
        }
    }

    /// All types, including disabled ones, in stable insertion order.
    pub fn list(&self) -> Vec<CustomActivityType> {
        self.types.lock().unwrap().clone()
    }

    /// The enabled subset, in the same stable insertion order so the editor's
    /// type picker does not reorder between renders.
    pub fn list_enabled(&self) -> Vec<CustomActivityType> {
        self.types
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.enabled)
            .cloned()
            .collect()
    }

    /// Look up one type by id.
    pub fn get_by_id(&self, id: &str) -> Option<CustomActivityType> {
        self.types
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == id)
            .cloned()
    }

    /// Create a user-defined type with a fresh id.
    pub fn create(
        &self,
        draft: ActivityTypeDraft,
    ) -> Result<CustomActivityType, TypeRegistryError> {
        let created = CustomActivityType {
            id: format!("type-{}", Uuid::new_v4()),
            label: draft.label,
            icon_name: draft.icon_name,
            border_color: draft.border_color,
            bg_color: draft.bg_color,
            enabled: draft.enabled,
            record_type: draft.record_type,
        };

        let mut types = self.types.lock().unwrap();
        types.push(created.clone());
        self.persist(&types)?;

        Ok(created)
    }

    /// Merge a partial update onto an existing type.
    ///
    /// The id itself is immutable (a patch carries no id). Everything else,
    /// including `record_type`, may be reassigned — for built-ins too.
    /// Activities already logged under the type keep their stored fields
    /// regardless of a record-type change.
    pub fn update(
        &self,
        id: &str,
        patch: ActivityTypePatch,
    ) -> Result<CustomActivityType, TypeRegistryError> {
        let mut types = self.types.lock().unwrap();
        let entry = types
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| TypeRegistryError::NotFound(id.to_string()))?;

        if let Some(label) = patch.label {
            entry.label = label;
        }
        if let Some(icon_name) = patch.icon_name {
            entry.icon_name = icon_name;
        }
        if let Some(border_color) = patch.border_color {
            entry.border_color = border_color;
        }
        if let Some(bg_color) = patch.bg_color {
            entry.bg_color = bg_color;
        }
        if let Some(enabled) = patch.enabled {
            entry.enabled = enabled;
        }
        if let Some(record_type) = patch.record_type {
            entry.record_type = record_type;
        }

        let updated = entry.clone();
        self.persist(&types)?;

        Ok(updated)
    }

    /// Remove a user-created type. Built-in types cannot be deleted, only
    /// disabled. Removing an absent user type is a no-op. No cascade:
    /// activities referencing the removed type keep their reference.
    pub fn delete(&self, id: &str) -> Result<(), TypeRegistryError> {
        if is_builtin_type(id) {
            return Err(TypeRegistryError::ProtectedType(id.to_string()));
        }

        let mut types = self.types.lock().unwrap();
        let before = types.len();
        types.retain(|t| t.id != id);

        if types.len() != before {
            self.persist(&types)?;
        }

        Ok(())
    }

    /// Re-read the taxonomy from storage, overwriting in-memory state.
    ///
    /// Used after an external write path (a settings screen saving through a
    /// separately-held registry instance) to resynchronize this one.
    pub fn reload(&self) {
        let types = {
            let backend = self.kv.lock().unwrap();
            load_or_seed(&backend)
        };
        *self.types.lock().unwrap() = types;
    }

    fn persist(&self, types: &[CustomActivityType]) -> Result<(), TypeRegistryError> {
        let json = serde_json::to_string(types)
            .map_err(|e| TypeRegistryError::Persistence(KvError::Serialization(e.to_string())))?;
        let backend = self.kv.lock().unwrap();
        if let Err(e) = backend.set(CUSTOM_TYPES_KEY, &json) {
            tracing::warn!("Failed to persist activity types, in-memory state kept: {e}");
            return Err(TypeRegistryError::Persistence(e));
        }
        Ok(())
    }
}

fn load_or_seed(kv: &KvStore) -> Vec<CustomActivityType> {
    match kv.get(CUSTOM_TYPES_KEY) {
        Ok(Some(json)) => match serde_json::from_str(&json) {
            Ok(types) => return types,
            Err(e) => tracing::error!("Stored activity types are unreadable, reseeding: {e}"),
        },
        Ok(None) => tracing::info!("No stored activity types, seeding built-in defaults"),
        Err(e) => tracing::error!("Failed to read activity types from storage, reseeding: {e}"),
    }

    let seed = builtin_types();
    match serde_json::to_string(&seed) {
        Ok(json) => {
            if let Err(e) = kv.set(CUSTOM_TYPES_KEY, &json) {
                tracing::warn!("Failed to persist type seed: {e}");
            }
        }
        Err(e) => tracing::warn!("Failed to serialize type seed: {e}"),
    }
    seed
}

/// Type registry errors.
#[derive(Debug, Error)]
pub enum TypeRegistryError {
    #[error("built-in type cannot be deleted: {0}")]
    ProtectedType(String),

    #[error("activity type not found: {0}")]
    NotFound(String),

    #[error("persistence failed: {0}")]
    Persistence(#[from] KvError),
}
