//! The activity store: durable CRUD over the activity collection.
//!
//! Single source of truth for every screen. The whole collection is written
//! through to storage as one JSON document on every successful mutation; a
//! mutex is held across the full snapshot-mutate-persist cycle so two
//! mutations issued back-to-back can never race the same snapshot.

use crate::model::activity::{
    Activity, ActivityDraft, ActivityPatch, VideoComment, VideoCommentDraft,
};
use crate::storage::kv::{KvError, KvStore};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use uuid::Uuid;

/// Storage key holding the activity collection.
pub const ACTIVITIES_KEY: &str = "activities";

/// Durable store for the activity collection.
pub struct ActivityStore {
    kv: Arc<Mutex<KvStore>>,
    activities: Mutex<Vec<Activity>>,
}

impl ActivityStore {
    /// Open the store over the given key-value backend.
    ///
    /// First run seeds the default dataset and persists it immediately so the
    /// next load is deterministic. A corrupt or unreadable document falls back
    /// to the same seed and is logged; loading never fails the caller.
    pub fn new(kv: Arc<Mutex<KvStore>>) -> Self {
        let activities = {
            let backend = kv.lock().unwrap();
            load_or_seed(&backend)
        };

        Self {
            kv,
            activities: Mutex::new(activities),
        }
    }

    /// The full current collection. Order carries no meaning; callers group
    /// and sort by `date` themselves.
    pub fn list(&self) -> Vec<Activity> {
        self.activities.lock().unwrap().clone()
    }

    /// Look up one activity. Absence is a normal outcome (e.g. navigating to
    /// a deleted record), not an error.
    pub fn get_by_id(&self, id: &str) -> Option<Activity> {
        self.activities
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == id)
            .cloned()
    }

    /// Create a new activity from a draft.
    ///
    /// Assigns a fresh id, stamps `created_at == updated_at`, appends and
    /// persists the collection, and returns the created record.
    pub fn create(&self, draft: ActivityDraft) -> Result<Activity, ActivityStoreError> {
        if draft.title.trim().is_empty() {
            return Err(ActivityStoreError::Validation(
                "title must not be empty".to_string(),
            ));
        }
        let date = parse_date(&draft.date)?;
        validate_effort_score(draft.effort_score)?;

        let now = Utc::now();
        let activity = Activity {
            id: Uuid::new_v4().to_string(),
            date,
            activity_type: draft.activity_type,
            title: draft.title,
            location: draft.location,
            weather: draft.weather,
            training_topic: draft.training_topic,
            lessons_learned: draft.lessons_learned,
            effort_score: draft.effort_score,
            kpt: draft.kpt.filter(|kpt| !kpt.is_empty()),
            match_type: draft.match_type,
            result: draft.result,
            score: draft.score,
            personal_stats: draft.personal_stats,
            good_points: draft.good_points,
            bad_points: draft.bad_points,
            tactical_notes: draft.tactical_notes,
            video_url: draft.video_url,
            photos: draft.photos,
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        let mut activities = self.activities.lock().unwrap();
        activities.push(activity.clone());
        self.persist(&activities)?;

        Ok(activity)
    }

    /// Merge a partial update onto an existing activity.
    ///
    /// Shallow field replacement: present patch fields replace the stored
    /// field wholesale; nested groups (`score`, `kpt`, `personal_stats`) are
    /// never deep-merged. Refreshes `updated_at` and persists.
    pub fn update(&self, id: &str, patch: ActivityPatch) -> Result<Activity, ActivityStoreError> {
        if let Some(title) = &patch.title {
            if title.trim().is_empty() {
                return Err(ActivityStoreError::Validation(
                    "title must not be empty".to_string(),
                ));
            }
        }
        validate_effort_score(patch.effort_score)?;

        let mut activities = self.activities.lock().unwrap();
        let activity = activities
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| ActivityStoreError::NotFound(id.to_string()))?;

        if let Some(date) = patch.date {
            activity.date = date;
        }
        if let Some(activity_type) = patch.activity_type {
            activity.activity_type = activity_type;
        }
        if let Some(title) = patch.title {
            activity.title = title;
        }
        if let Some(location) = patch.location {
            activity.location = Some(location);
        }
        if let Some(weather) = patch.weather {
            activity.weather = Some(weather);
        }
        if let Some(training_topic) = patch.training_topic {
            activity.training_topic = Some(training_topic);
        }
        if let Some(lessons_learned) = patch.lessons_learned {
            activity.lessons_learned = Some(lessons_learned);
        }
        if let Some(effort_score) = patch.effort_score {
            activity.effort_score = Some(effort_score);
        }
        if let Some(kpt) = patch.kpt {
            // An all-empty group clears the stored retrospective.
            activity.kpt = Some(kpt).filter(|k| !k.is_empty());
        }
        if let Some(match_type) = patch.match_type {
            activity.match_type = Some(match_type);
        }
        if let Some(result) = patch.result {
            activity.result = Some(result);
        }
        if let Some(score) = patch.score {
            activity.score = Some(score);
        }
        if let Some(personal_stats) = patch.personal_stats {
            activity.personal_stats = Some(personal_stats);
        }
        if let Some(good_points) = patch.good_points {
            activity.good_points = Some(good_points);
        }
        if let Some(bad_points) = patch.bad_points {
            activity.bad_points = Some(bad_points);
        }
        if let Some(tactical_notes) = patch.tactical_notes {
            activity.tactical_notes = Some(tactical_notes);
        }
        if let Some(video_url) = patch.video_url {
            activity.video_url = Some(video_url);
        }
        if let Some(photos) = patch.photos {
            activity.photos = Some(photos);
        }

        activity.updated_at = next_timestamp(activity.updated_at);
        let updated = activity.clone();
        self.persist(&activities)?;

        Ok(updated)
    }

    /// Remove an activity. Idempotent: deleting an absent id is a no-op, so a
    /// confirmation dialog double-firing cannot surface an error.
    pub fn delete(&self, id: &str) -> Result<(), ActivityStoreError> {
        let mut activities = self.activities.lock().unwrap();
        let before = activities.len();
        activities.retain(|a| a.id != id);

        if activities.len() != before {
            self.persist(&activities)?;
        }

        Ok(())
    }

    /// Append a timestamped video comment to an activity.
    ///
    /// Comments are append-only and immutable once created.
    pub fn add_comment(
        &self,
        id: &str,
        draft: VideoCommentDraft,
    ) -> Result<Activity, ActivityStoreError> {
        if draft.content.trim().is_empty() {
            return Err(ActivityStoreError::Validation(
                "comment content must not be empty".to_string(),
            ));
        }
        if !draft.timestamp.is_finite() || draft.timestamp < 0.0 {
            return Err(ActivityStoreError::Validation(
                "comment timestamp must be a non-negative number of seconds".to_string(),
            ));
        }

        let mut activities = self.activities.lock().unwrap();
        let activity = activities
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| ActivityStoreError::NotFound(id.to_string()))?;

        activity.comments.push(VideoComment {
            id: Uuid::new_v4().to_string(),
            timestamp: draft.timestamp,
            content: draft.content,
            author_id: draft.author_id,
            author_name: draft.author_name,
            mentions: draft.mentions,
            replies: Vec::new(),
            created_at: Utc::now(),
        });
        activity.updated_at = next_timestamp(activity.updated_at);
        let updated = activity.clone();
        self.persist(&activities)?;

        Ok(updated)
    }

    /// Write the whole collection through to storage.
    ///
    /// On failure the in-memory change is kept and the error surfaced: the
    /// caller warns the user that changes may be lost on restart rather than
    /// seeing their edit vanish.
    fn persist(&self, activities: &[Activity]) -> Result<(), ActivityStoreError> {
        let json = encode(activities)?;
        let backend = self.kv.lock().unwrap();
        if let Err(e) = backend.set(ACTIVITIES_KEY, &json) {
            tracing::warn!("Failed to persist activities, in-memory state kept: {e}");
            return Err(ActivityStoreError::Persistence(e));
        }
        Ok(())
    }
}

fn encode(activities: &[Activity]) -> Result<String, ActivityStoreError> {
    serde_json::to_string(activities)
        .map_err(|e| ActivityStoreError::Persistence(KvError::Serialization(e.to_string())))
}

fn load_or_seed(kv: &KvStore) -> Vec<Activity> {
    match kv.get(ACTIVITIES_KEY) {
        Ok(Some(json)) => match serde_json::from_str(&json) {
            Ok(activities) => return activities,
            Err(e) => tracing::error!("Stored activities are unreadable, reseeding: {e}"),
        },
        Ok(None) => tracing::info!("No stored activities, seeding default dataset"),
        Err(e) => tracing::error!("Failed to read activities from storage, reseeding: {e}"),
    }

    // The default dataset is the empty collection; persisting it immediately
    // makes subsequent loads deterministic.
    let seed: Vec<Activity> = Vec::new();
    match serde_json::to_string(&seed) {
        Ok(json) => {
            if let Err(e) = kv.set(ACTIVITIES_KEY, &json) {
                tracing::warn!("Failed to persist activity seed: {e}");
            }
        }
        Err(e) => tracing::warn!("Failed to serialize activity seed: {e}"),
    }
    seed
}

fn parse_date(date: &str) -> Result<NaiveDate, ActivityStoreError> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| ActivityStoreError::Validation(format!("unparsable date: {date:?}")))
}

fn validate_effort_score(score: Option<u8>) -> Result<(), ActivityStoreError> {
    match score {
        Some(s) if !(1..=5).contains(&s) => Err(ActivityStoreError::Validation(format!(
            "effort score must be between 1 and 5, got {s}"
        ))),
        _ => Ok(()),
    }
}

/// A fresh `updated_at`, strictly after the previous one even when the clock
/// has not ticked between successive mutations.
fn next_timestamp(after: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > after {
        now
    } else {
        after + Duration::microseconds(1)
    }
}

/// Activity store errors.
#[derive(Debug, Error)]
pub enum ActivityStoreError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("activity not found: {0}")]
    NotFound(String),

    #[error("persistence failed: {0}")]
    Persistence(#[from] KvError),
}
