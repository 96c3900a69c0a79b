//! Monthly statistics projection.
//!
//! A pure fold over the activity list for one calendar month. Activities are
//! partitioned into training-like and match-like by resolving their type
//! against the taxonomy snapshot the caller passes in — never against a
//! hardcoded id list, so user-created types aggregate correctly.

use crate::model::activity::{Activity, MatchResult};
use crate::model::activity_type::{record_type_of, CustomActivityType, RecordType};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A calendar month, the grouping unit of the statistics dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// `None` unless `month` is 1-12.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// The month a date falls in.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// True when `date` falls inside this month.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Failed to parse a `YYYY-MM` month string.
#[derive(Debug, Error)]
#[error("invalid year-month {0:?}, expected YYYY-MM")]
pub struct YearMonthParseError(pub String);

impl FromStr for YearMonth {
    type Err = YearMonthParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || YearMonthParseError(s.to_string());
        let (year, month) = s.split_once('-').ok_or_else(err)?;
        let year: i32 = year.parse().map_err(|_| err())?;
        let month: u32 = month.parse().map_err(|_| err())?;
        YearMonth::new(year, month).ok_or_else(err)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Aggregate figures for one month of activities.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyStats {
    pub month: YearMonth,
    pub total_activities: u32,
    pub training_count: u32,
    pub match_count: u32,
    /// Sum of personal goals across match-like activities; missing stats
    /// count as zero.
    pub total_goals: u32,
    pub total_assists: u32,
    /// Mean effort score across training-like activities that have one set;
    /// activities without a score are excluded from both numerator and
    /// denominator. Zero when no activity has a score.
    pub avg_effort_score: f32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    /// Wins as a nearest-integer percentage of match-like activities with a
    /// recorded result; zero when no result is recorded.
    pub win_rate: u8,
}

/// Fold the activity list into aggregate figures for one month.
///
/// Pure and deterministic: never mutates its inputs, and identical inputs
/// yield identical output. Activities whose type no longer exists in the
/// taxonomy count toward the total but toward neither partition.
pub fn project(
    activities: &[Activity],
    month: YearMonth,
    types: &[CustomActivityType],
) -> MonthlyStats {
    let mut total_activities = 0u32;
    let mut training_count = 0u32;
    let mut match_count = 0u32;
    let mut total_goals = 0u32;
    let mut total_assists = 0u32;
    let mut effort_sum = 0u32;
    let mut effort_samples = 0u32;
    let mut wins = 0u32;
    let mut draws = 0u32;
    let mut losses = 0u32;
    let mut decided_matches = 0u32;

    for activity in activities.iter().filter(|a| month.contains(a.date)) {
        total_activities += 1;

        match record_type_of(types, &activity.activity_type) {
            Some(RecordType::Training) => {
                training_count += 1;
                if let Some(score) = activity.effort_score {
                    effort_sum += u32::from(score);
                    effort_samples += 1;
                }
            }
            Some(RecordType::Match) => {
                match_count += 1;
                if let Some(stats) = activity.personal_stats {
                    total_goals += stats.goals;
                    total_assists += stats.assists;
                }
                if let Some(result) = activity.result {
                    decided_matches += 1;
                    match result {
                        MatchResult::Win => wins += 1,
                        MatchResult::Draw => draws += 1,
                        MatchResult::Lose => losses += 1,
                    }
                }
            }
            None => {}
        }
    }

    let avg_effort_score = if effort_samples > 0 {
        effort_sum as f32 / effort_samples as f32
    } else {
        0.0
    };
    let win_rate = if decided_matches > 0 {
        ((f64::from(wins) / f64::from(decided_matches)) * 100.0).round() as u8
    } else {
        0
    };

    MonthlyStats {
        month,
        total_activities,
        training_count,
        match_count,
        total_goals,
        total_assists,
        avg_effort_score,
        wins,
        draws,
        losses,
        win_rate,
    }
}
