use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Per-day counters, reset on the first access of a new day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyStats {
    pub date: Option<NaiveDate>,
    pub goals_completed: u32,
    pub habits_completed: u32,
    /// Minutes.
    pub focus_time: u64,
    /// Minutes.
    pub break_time: u64,
    pub focus_sessions: u32,
    pub productivity_score: u32,
}

impl DailyStats {
    pub fn for_day(day: NaiveDate) -> Self {
        Self {
            date: Some(day),
            ..Self::default()
        }
    }

    /// Reset the counters if they belong to another day. Returns true when
    /// a reset happened.
    pub fn rollover(&mut self, today: NaiveDate) -> bool {
        if self.date == Some(today) {
            return false;
        }
        tracing::debug!("daily stats rollover to {today}");
        *self = Self::for_day(today);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[test]
    fn same_day_keeps_counters() {
        let mut stats = DailyStats::for_day(day(1));
        stats.focus_time = 50;
        assert!(!stats.rollover(day(1)));
        assert_eq!(stats.focus_time, 50);
    }

    #[test]
    fn new_day_resets_counters() {
        let mut stats = DailyStats::for_day(day(1));
        stats.goals_completed = 2;
        assert!(stats.rollover(day(2)));
        assert_eq!(stats, DailyStats::for_day(day(2)));
    }

    #[test]
    fn reads_legacy_date_strings() {
        let stats: DailyStats =
            serde_json::from_str(r#"{"date": "2024-05-03", "focus_time": 40}"#).unwrap();
        assert_eq!(stats.date, Some(day(3)));
        assert_eq!(stats.focus_time, 40);
    }
}
