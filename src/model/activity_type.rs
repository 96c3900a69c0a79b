//! The user-customizable activity-type taxonomy.
//!
//! Six built-in types ship by default and can be disabled but never deleted;
//! user-created types can be freely added and removed. Activity records
//! reference a type by id without referential integrity, so every renderer
//! resolves the reference through `resolve_type_label` and degrades to a
//! generic label when the type is gone.

use serde::{Deserialize, Serialize};

/// Which field group the editor shows for activities of a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordType {
    /// Training-shaped: topic, lessons learned, effort score, KPT.
    Training,
    /// Match-shaped: match type, result, score, personal stats, notes.
    Match,
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordType::Training => write!(f, "training"),
            RecordType::Match => write!(f, "match"),
        }
    }
}

/// Reference into the fixed icon catalog.
///
/// The registry only stores the name; resolving it to a renderable asset is
/// the presentation layer's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconName {
    Training,
    Match,
    Plab,
    Other,
    TeamKakao,
    Lesson,
    Icon1,
    Icon2,
    Icon3,
    Ball,
    Clap,
    Flag,
}

/// One entry in the activity-type taxonomy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomActivityType {
    /// Stable id: a fixed built-in id, or `type-<uuid>` for user-created types.
    pub id: String,
    pub label: String,
    pub icon_name: IconName,
    /// Presentation hex color for the calendar cell border.
    pub border_color: String,
    /// Presentation hex color for the calendar cell background.
    pub bg_color: String,
    /// Disabled types are hidden from the editor's type picker; historical
    /// activities referencing them still render.
    pub enabled: bool,
    pub record_type: RecordType,
}

/// Caller-supplied fields for a new user-created type.
#[derive(Debug, Clone)]
pub struct ActivityTypeDraft {
    pub label: String,
    pub icon_name: IconName,
    pub border_color: String,
    pub bg_color: String,
    pub enabled: bool,
    pub record_type: RecordType,
}

/// Partial update for an existing type. The id itself is immutable; everything
/// else, including `record_type`, may be reassigned. Activities already logged
/// under the type keep their stored fields regardless of a record-type change.
#[derive(Debug, Clone, Default)]
pub struct ActivityTypePatch {
    pub label: Option<String>,
    pub icon_name: Option<IconName>,
    pub border_color: Option<String>,
    pub bg_color: Option<String>,
    pub enabled: Option<bool>,
    pub record_type: Option<RecordType>,
}

/// Ids of the six built-in types. These cannot be deleted, only disabled.
pub const BUILTIN_TYPE_IDS: [&str; 6] =
    ["training", "match", "plab", "other", "teamkakao", "lesson"];

/// Label shown for activities whose type no longer exists in the taxonomy.
pub const UNKNOWN_TYPE_LABEL: &str = "Activity";

/// True when `id` names one of the six built-in types.
pub fn is_builtin_type(id: &str) -> bool {
    BUILTIN_TYPE_IDS.contains(&id)
}

/// The default taxonomy: the six built-in types with their shipped colors.
pub fn builtin_types() -> Vec<CustomActivityType> {
    vec![
        CustomActivityType {
            id: "training".to_string(),
            label: "Training".to_string(),
            icon_name: IconName::Training,
            border_color: "#93C5FD".to_string(),
            bg_color: "#93C5FD18".to_string(),
            enabled: true,
            record_type: RecordType::Training,
        },
        CustomActivityType {
            id: "match".to_string(),
            label: "Match".to_string(),
            icon_name: IconName::Match,
            border_color: "#F9A8D4".to_string(),
            bg_color: "#FFF8FC".to_string(),
            enabled: true,
            record_type: RecordType::Match,
        },
        CustomActivityType {
            id: "plab".to_string(),
            label: "Pick-up Match".to_string(),
            icon_name: IconName::Plab,
            border_color: "#F9A8D4".to_string(),
            bg_color: "#FFF8FC".to_string(),
            enabled: true,
            record_type: RecordType::Match,
        },
        CustomActivityType {
            id: "other".to_string(),
            label: "Extra Practice".to_string(),
            icon_name: IconName::Other,
            border_color: "#FDE68A".to_string(),
            bg_color: "#FFFEF8".to_string(),
            enabled: true,
            record_type: RecordType::Training,
        },
        CustomActivityType {
            id: "teamkakao".to_string(),
            label: "Team Event".to_string(),
            icon_name: IconName::TeamKakao,
            border_color: "#93C5FD".to_string(),
            bg_color: "#93C5FD18".to_string(),
            enabled: true,
            record_type: RecordType::Match,
        },
        CustomActivityType {
            id: "lesson".to_string(),
            label: "Private Lesson".to_string(),
            icon_name: IconName::Lesson,
            border_color: "#93C5FD".to_string(),
            bg_color: "#93C5FD18".to_string(),
            enabled: true,
            record_type: RecordType::Training,
        },
    ]
}

/// Resolve a type reference to its display label, degrading to a generic
/// label when the referenced type is gone from the taxonomy.
pub fn resolve_type_label<'a>(types: &'a [CustomActivityType], type_id: &str) -> &'a str {
    types
        .iter()
        .find(|t| t.id == type_id)
        .map(|t| t.label.as_str())
        .unwrap_or(UNKNOWN_TYPE_LABEL)
}

/// Resolve a type reference to its record shape, `None` for orphaned
/// references.
pub fn record_type_of(types: &[CustomActivityType], type_id: &str) -> Option<RecordType> {
    types
        .iter()
        .find(|t| t.id == type_id)
        .map(|t| t.record_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_set_is_complete() {
        let types = builtin_types();
        assert_eq!(types.len(), 6);
        for id in BUILTIN_TYPE_IDS {
            assert!(types.iter().any(|t| t.id == id), "missing builtin {id}");
            assert!(is_builtin_type(id));
        }
        assert!(!is_builtin_type("type-123"));
    }

    #[test]
    fn test_builtin_record_shapes() {
        let types = builtin_types();
        assert_eq!(record_type_of(&types, "training"), Some(RecordType::Training));
        assert_eq!(record_type_of(&types, "match"), Some(RecordType::Match));
        assert_eq!(record_type_of(&types, "plab"), Some(RecordType::Match));
        assert_eq!(record_type_of(&types, "other"), Some(RecordType::Training));
        assert_eq!(record_type_of(&types, "teamkakao"), Some(RecordType::Match));
        assert_eq!(record_type_of(&types, "lesson"), Some(RecordType::Training));
    }

    #[test]
    fn test_resolve_label_falls_back_for_orphans() {
        let types = builtin_types();
        assert_eq!(resolve_type_label(&types, "training"), "Training");
        assert_eq!(resolve_type_label(&types, "deleted-type"), UNKNOWN_TYPE_LABEL);
        assert_eq!(record_type_of(&types, "deleted-type"), None);
    }

    #[test]
    fn test_icon_name_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&IconName::TeamKakao).unwrap(),
            "\"teamkakao\""
        );
        assert_eq!(serde_json::to_string(&IconName::Icon1).unwrap(), "\"icon1\"");
    }

    #[test]
    fn test_type_json_layout() {
        let json = serde_json::to_string(&builtin_types()[0]).unwrap();
        assert!(json.contains("\"iconName\":\"training\""));
        assert!(json.contains("\"borderColor\":\"#93C5FD\""));
        assert!(json.contains("\"recordType\":\"training\""));
    }
}
