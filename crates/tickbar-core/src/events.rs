use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::pomodoro::PomodoroPhase;
use crate::timer::TimerKind;

/// Every user-visible state change produces an Event.
///
/// Engines return events instead of talking to the desktop; the caller
/// hands them to a [`Notifier`](crate::notify::Notifier).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        name: String,
        kind: TimerKind,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    StopwatchStarted {
        name: String,
        at: DateTime<Utc>,
    },
    TimerPaused {
        name: String,
        at: DateTime<Utc>,
    },
    TimerResumed {
        name: String,
        at: DateTime<Utc>,
    },
    /// Stopped by the user before the countdown ran out.
    TimerStopped {
        name: String,
        at: DateTime<Utc>,
    },
    /// Countdown ran out; detected on the first poll after the deadline.
    TimerCompleted {
        name: String,
        kind: TimerKind,
        at: DateTime<Utc>,
    },
    AlarmSet {
        name: String,
        time_of_day: String,
        at: DateTime<Utc>,
    },
    AlarmRemoved {
        name: String,
        at: DateTime<Utc>,
    },
    AlarmToggled {
        name: String,
        enabled: bool,
        at: DateTime<Utc>,
    },
    AlarmFired {
        name: String,
        at: DateTime<Utc>,
    },
    /// A pomodoro phase ran out and the cycle moved on.
    PomodoroPhaseEnded {
        ended: PomodoroPhase,
        next_label: String,
        at: DateTime<Utc>,
    },
    PointsAwarded {
        points: u64,
        total: u64,
        reason: String,
        at: DateTime<Utc>,
    },
    LevelUp {
        level: u64,
        at: DateTime<Utc>,
    },
    AchievementUnlocked {
        id: String,
        name: String,
        icon: String,
        description: String,
        at: DateTime<Utc>,
    },
    GoalAdded {
        title: String,
        at: DateTime<Utc>,
    },
    GoalCompleted {
        title: String,
        at: DateTime<Utc>,
    },
    HabitAdded {
        name: String,
        at: DateTime<Utc>,
    },
    HabitCompleted {
        name: String,
        streak: u32,
        at: DateTime<Utc>,
    },
    NoteAdded {
        title: String,
        at: DateTime<Utc>,
    },
    NoteArchived {
        title: String,
        archived: bool,
        at: DateTime<Utc>,
    },
}
