//! Single-file backup of every productivity record.
//!
//! The layout matches the panel scripts' export: one object keyed by
//! record name. Import writes back only the keys that are present.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::achievements::AchievementState;
use super::analytics::Analytics;
use super::goals::GoalBook;
use super::habits::HabitBook;
use super::notes::NoteBook;
use super::stats::DailyStats;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataExport {
    #[serde(with = "super::timestamp::option", skip_serializing_if = "Option::is_none")]
    pub export_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goals: Option<GoalBook>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub achievements: Option<AchievementState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub habits: Option<HabitBook>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<NoteBook>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analytics: Option<Analytics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_stats: Option<DailyStats>,
}

impl DataExport {
    /// Names of the records this export carries, in import order.
    pub fn sections(&self) -> Vec<&'static str> {
        [
            ("goals", self.goals.is_some()),
            ("achievements", self.achievements.is_some()),
            ("habits", self.habits.is_some()),
            ("notes", self.notes.is_some()),
            ("analytics", self.analytics.is_some()),
            ("daily_stats", self.daily_stats.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, present)| present.then_some(name))
        .collect()
    }
}
