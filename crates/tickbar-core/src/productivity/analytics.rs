//! Focus/break session log.
//!
//! Records are appended when a focus or break countdown starts and closed
//! once when it completes or is stopped. They are never deleted. Keys this
//! crate does not know about (screen time, app usage) are carried through
//! unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::TimerKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TimerKind,
    /// Minutes.
    pub planned_duration: f64,
    #[serde(with = "super::timestamp")]
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub interrupted: bool,
    /// Minutes actually run, excluding pauses.
    #[serde(default)]
    pub actual_duration: Option<f64>,
    #[serde(default, with = "super::timestamp::option")]
    pub end_time: Option<DateTime<Utc>>,
}

impl SessionRecord {
    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Analytics {
    pub focus_sessions: Vec<SessionRecord>,
    pub break_sessions: Vec<SessionRecord>,
    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>,
}

impl Analytics {
    pub fn push(&mut self, record: SessionRecord) {
        match record.kind {
            TimerKind::Break => self.break_sessions.push(record),
            _ => self.focus_sessions.push(record),
        }
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut SessionRecord> {
        self.focus_sessions
            .iter_mut()
            .chain(self.break_sessions.iter_mut())
            .find(|r| r.id == id)
    }

    pub fn find(&self, id: &str) -> Option<&SessionRecord> {
        self.focus_sessions
            .iter()
            .chain(self.break_sessions.iter())
            .find(|r| r.id == id)
    }
}
