//! Persisted timer record and its clock arithmetic.
//!
//! Times are fractional epoch seconds so the file stays readable next to the
//! panel's other cache files. All methods take `now` explicitly.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerMode {
    #[default]
    Idle,
    Timer,
    Stopwatch,
}

/// Sub-tag of a countdown. Focus and break countdowns are tracked as
/// sessions by the productivity store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerKind {
    #[default]
    General,
    Focus,
    Break,
}

impl TimerKind {
    pub fn is_session(self) -> bool {
        matches!(self, TimerKind::Focus | TimerKind::Break)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TimerKind::General => "general",
            TimerKind::Focus => "focus",
            TimerKind::Break => "break",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerState {
    pub mode: TimerMode,
    pub start_time: f64,
    /// Countdown length in seconds; 0 for a stopwatch.
    pub duration: u64,
    pub paused: bool,
    pub pause_start: f64,
    pub total_pause_time: f64,
    pub timer_name: String,
    pub timer_type: TimerKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl Default for TimerState {
    fn default() -> Self {
        Self {
            mode: TimerMode::Idle,
            start_time: 0.0,
            duration: 0,
            paused: false,
            pause_start: 0.0,
            total_pause_time: 0.0,
            timer_name: "Timer".into(),
            timer_type: TimerKind::General,
            session_id: None,
        }
    }
}

impl TimerState {
    pub fn countdown(now: f64, duration: u64, name: &str, kind: TimerKind) -> Self {
        Self {
            mode: TimerMode::Timer,
            start_time: now,
            duration,
            timer_name: name.to_string(),
            timer_type: kind,
            ..Self::default()
        }
    }

    pub fn stopwatch(now: f64, name: &str) -> Self {
        Self {
            mode: TimerMode::Stopwatch,
            start_time: now,
            timer_name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn is_idle(&self) -> bool {
        self.mode == TimerMode::Idle
    }

    /// Running seconds, excluding pauses. Frozen while paused.
    pub fn elapsed(&self, now: f64) -> f64 {
        let reference = if self.paused { self.pause_start } else { now };
        (reference - self.start_time - self.total_pause_time).max(0.0)
    }

    pub fn remaining(&self, now: f64) -> f64 {
        (self.duration as f64 - self.elapsed(now)).max(0.0)
    }

    /// 0 .. 100 progress of a countdown.
    pub fn progress_pct(&self, now: f64) -> f64 {
        if self.duration == 0 {
            return 0.0;
        }
        (self.elapsed(now) / self.duration as f64 * 100.0).min(100.0)
    }

    /// A running countdown whose deadline has passed.
    pub fn is_due(&self, now: f64) -> bool {
        self.mode == TimerMode::Timer && !self.paused && self.elapsed(now) >= self.duration as f64
    }

    pub fn pause(&mut self, now: f64) {
        if self.is_idle() || self.paused {
            return;
        }
        self.paused = true;
        self.pause_start = now;
    }

    pub fn resume(&mut self, now: f64) {
        if self.is_idle() || !self.paused {
            return;
        }
        self.total_pause_time += (now - self.pause_start).max(0.0);
        self.paused = false;
        self.pause_start = 0.0;
    }
}
