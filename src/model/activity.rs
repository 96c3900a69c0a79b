//! Activity records: one logged training session or match.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Kind of match an activity was logged for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Tournament,
    Friendly,
    /// Pick-up match organized through a booking platform.
    Plab,
}

impl std::fmt::Display for MatchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchType::Tournament => write!(f, "Tournament"),
            MatchType::Friendly => write!(f, "Friendly"),
            MatchType::Plab => write!(f, "Pick-up"),
        }
    }
}

/// Outcome of a match from the player's team perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchResult {
    Win,
    Lose,
    Draw,
}

impl std::fmt::Display for MatchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchResult::Win => write!(f, "Win"),
            MatchResult::Lose => write!(f, "Lose"),
            MatchResult::Draw => write!(f, "Draw"),
        }
    }
}

/// Keep/Problem/Try retrospective attached to a training session.
///
/// All three fields are free text and may be empty; the group as a whole is
/// only stored on an activity when at least one field is non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kpt {
    pub keep: String,
    pub problem: String,
    #[serde(rename = "try")]
    pub try_next: String,
}

impl Kpt {
    /// True when every field is empty, i.e. the group carries no content.
    pub fn is_empty(&self) -> bool {
        self.keep.is_empty() && self.problem.is_empty() && self.try_next.is_empty()
    }
}

/// Final score of a match (own team first).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchScore {
    pub team: u32,
    pub opponent: u32,
}

/// Personal goal/assist tally for one match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalStats {
    pub goals: u32,
    pub assists: u32,
}

/// A timestamped annotation on an activity's video.
///
/// Comments are created through `ActivityStore::add_comment` and are immutable
/// afterwards; there is no edit or delete path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoComment {
    pub id: String,
    /// Position in the video, in seconds.
    pub timestamp: f64,
    pub content: String,
    pub author_id: String,
    pub author_name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mentions: Vec<String>,
    /// Nested replies. Structurally supported; no mutating operation targets them.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub replies: Vec<VideoComment>,
    pub created_at: DateTime<Utc>,
}

/// Caller-supplied fields for a new video comment.
#[derive(Debug, Clone, Default)]
pub struct VideoCommentDraft {
    pub timestamp: f64,
    pub content: String,
    pub author_id: String,
    pub author_name: String,
    pub mentions: Vec<String>,
}

/// One logged event: a training session, a match, or any user-defined type.
///
/// `activity_type` is a soft reference into the type taxonomy by id. It is a
/// plain string rather than a closed enum so that user-created types are
/// representable; it is resolved against the live registry at render time and
/// never validated at write time. Which optional field group is semantically
/// active is determined by the referenced type's `record_type`, not by which
/// fields happen to be populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    /// Calendar date the activity took place on (the calendar grouping key).
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub activity_type: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather: Option<String>,

    // Training-shaped fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub training_topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lessons_learned: Option<String>,
    /// Self-rated effort, 1-5 inclusive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effort_score: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kpt: Option<Kpt>,

    // Match-shaped fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_type: Option<MatchType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<MatchResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<MatchScore>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personal_stats: Option<PersonalStats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub good_points: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bad_points: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tactical_notes: Option<String>,

    // Media
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photos: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<VideoComment>,

    /// Stamped by the store at creation; never changes afterwards.
    pub created_at: DateTime<Utc>,
    /// Refreshed by the store on every successful mutation of this record.
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied fields for a new activity.
///
/// The store assigns `id`, `created_at` and `updated_at`; the comment list of
/// a new activity is always empty. The date arrives as an ISO `YYYY-MM-DD`
/// string (the form field's wire shape) and is parsed and validated by
/// `ActivityStore::create`.
#[derive(Debug, Clone, Default)]
pub struct ActivityDraft {
    pub date: String,
    pub activity_type: String,
    pub title: String,
    pub location: Option<String>,
    pub weather: Option<String>,
    pub training_topic: Option<String>,
    pub lessons_learned: Option<String>,
    pub effort_score: Option<u8>,
    pub kpt: Option<Kpt>,
    pub match_type: Option<MatchType>,
    pub result: Option<MatchResult>,
    pub score: Option<MatchScore>,
    pub personal_stats: Option<PersonalStats>,
    pub good_points: Option<String>,
    pub bad_points: Option<String>,
    pub tactical_notes: Option<String>,
    pub video_url: Option<String>,
    pub photos: Option<Vec<String>>,
}

/// Partial update for an existing activity.
///
/// Shallow-merge semantics: a `Some` field replaces the stored field wholesale.
/// Nested groups (`score`, `kpt`, `personal_stats`) are never deep-merged; the
/// editor always sends the full group. A `None` field leaves the stored value
/// untouched, so clearing a populated optional group is not expressible through
/// a patch.
#[derive(Debug, Clone, Default)]
pub struct ActivityPatch {
    pub date: Option<NaiveDate>,
    pub activity_type: Option<String>,
    pub title: Option<String>,
    pub location: Option<String>,
    pub weather: Option<String>,
    pub training_topic: Option<String>,
    pub lessons_learned: Option<String>,
    pub effort_score: Option<u8>,
    pub kpt: Option<Kpt>,
    pub match_type: Option<MatchType>,
    pub result: Option<MatchResult>,
    pub score: Option<MatchScore>,
    pub personal_stats: Option<PersonalStats>,
    pub good_points: Option<String>,
    pub bad_points: Option<String>,
    pub tactical_notes: Option<String>,
    pub video_url: Option<String>,
    pub photos: Option<Vec<String>>,
}
