//! Stand-alone pomodoro cycle.
//!
//! Independent of the timer engine: work and break phases alternate on
//! their own, with a long break after every Nth completed work phase. As
//! with the timer, an expired phase is only noticed on the next poll, and
//! the following phase starts at that moment.

use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::error::Result;
use crate::events::Event;
use crate::status::WaybarStatus;
use crate::storage::{PomodoroConfig, StateStore, POMODORO_FILE};
use crate::timer::format_clock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PomodoroPhase {
    #[default]
    Work,
    Break,
}

impl PomodoroPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            PomodoroPhase::Work => "work",
            PomodoroPhase::Break => "break",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            PomodoroPhase::Work => "Work",
            PomodoroPhase::Break => "Break",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PomodoroState {
    pub active: bool,
    pub mode: PomodoroPhase,
    /// Epoch seconds.
    pub start_time: f64,
    /// Seconds.
    pub duration: u64,
    pub completed_pomodoros: u32,
}

impl Default for PomodoroState {
    fn default() -> Self {
        Self {
            active: false,
            mode: PomodoroPhase::Work,
            start_time: 0.0,
            duration: 25 * 60,
            completed_pomodoros: 0,
        }
    }
}

impl PomodoroState {
    pub fn remaining(&self, now: f64) -> f64 {
        (self.duration as f64 - (now - self.start_time).max(0.0)).max(0.0)
    }
}

pub struct PomodoroPoll {
    pub events: Vec<Event>,
    pub status: WaybarStatus,
}

pub struct PomodoroCycle<'a> {
    store: &'a StateStore,
    clock: &'a dyn Clock,
    config: &'a PomodoroConfig,
    state: PomodoroState,
}

impl<'a> PomodoroCycle<'a> {
    pub fn load(store: &'a StateStore, clock: &'a dyn Clock, config: &'a PomodoroConfig) -> Self {
        Self {
            store,
            clock,
            config,
            state: store.load(POMODORO_FILE),
        }
    }

    pub fn state(&self) -> &PomodoroState {
        &self.state
    }

    fn begin(&mut self, phase: PomodoroPhase, minutes: u64) {
        self.state.active = true;
        self.state.mode = phase;
        self.state.start_time = self.clock.epoch_secs();
        self.state.duration = minutes * 60;
    }

    /// Start a work phase, or stop the cycle if one is running.
    pub fn toggle(&mut self) -> Result<()> {
        if self.state.active {
            self.state.active = false;
        } else {
            self.begin(PomodoroPhase::Work, self.config.work_minutes);
        }
        tracing::debug!("pomodoro active: {}", self.state.active);
        self.store.save(POMODORO_FILE, &self.state)
    }

    pub fn end(&mut self) -> Result<()> {
        self.state.active = false;
        self.store.save(POMODORO_FILE, &self.state)
    }

    /// Jump straight into a short break.
    pub fn start_break(&mut self) -> Result<()> {
        self.begin(PomodoroPhase::Break, self.config.short_break_minutes);
        self.store.save(POMODORO_FILE, &self.state)
    }

    /// Advance the cycle if the current phase ran out and render it.
    pub fn poll(&mut self) -> Result<PomodoroPoll> {
        if !self.state.active {
            return Ok(PomodoroPoll {
                events: Vec::new(),
                status: WaybarStatus::new(
                    "Pomodoro",
                    "Click to start a Pomodoro session",
                    "pomodoro-inactive",
                )
                .with_alt("inactive"),
            });
        }

        let now = self.clock.epoch_secs();
        let remaining = self.state.remaining(now);
        if remaining > 0.0 {
            let clock = format_clock(remaining);
            let mode = self.state.mode;
            return Ok(PomodoroPoll {
                events: Vec::new(),
                status: WaybarStatus::new(
                    clock.clone(),
                    format!(
                        "Mode: {}\nRemaining: {clock}\nCompleted Pomodoros: {}",
                        mode.title(),
                        self.state.completed_pomodoros
                    ),
                    format!("pomodoro-{}-active", mode.as_str()),
                )
                .with_alt(mode.as_str()),
            });
        }

        let ended = self.state.mode;
        let label = self.advance();
        self.store.save(POMODORO_FILE, &self.state)?;
        tracing::info!("pomodoro {} phase ended, next: {label}", ended.as_str());

        let mode = self.state.mode;
        Ok(PomodoroPoll {
            events: vec![Event::PomodoroPhaseEnded {
                ended,
                next_label: label.to_string(),
                at: self.clock.now(),
            }],
            status: WaybarStatus::new(
                label,
                format!(
                    "Mode: {}\nCompleted Pomodoros: {}",
                    mode.title(),
                    self.state.completed_pomodoros
                ),
                format!("pomodoro-{}", mode.as_str()),
            )
            .with_alt(mode.as_str()),
        })
    }

    fn advance(&mut self) -> &'static str {
        match self.state.mode {
            PomodoroPhase::Work => {
                self.state.completed_pomodoros += 1;
                let every = self.config.pomodoros_before_long_break.max(1);
                if self.state.completed_pomodoros % every == 0 {
                    self.begin(PomodoroPhase::Break, self.config.long_break_minutes);
                    "Long break"
                } else {
                    self.begin(PomodoroPhase::Break, self.config.short_break_minutes);
                    "Short break"
                }
            }
            PomodoroPhase::Break => {
                self.begin(PomodoroPhase::Work, self.config.work_minutes);
                "Focus time"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::Utc;

    #[test]
    fn inactive_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path());
        let clock = ManualClock::new(Utc::now());
        let config = PomodoroConfig::default();
        let mut cycle = PomodoroCycle::load(&store, &clock, &config);
        let poll = cycle.poll().unwrap();
        assert_eq!(poll.status.class, "pomodoro-inactive");
        assert_eq!(poll.status.alt.as_deref(), Some("inactive"));
    }

    #[test]
    fn toggle_starts_and_stops_work() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path());
        let clock = ManualClock::new(Utc::now());
        let config = PomodoroConfig::default();
        let mut cycle = PomodoroCycle::load(&store, &clock, &config);

        cycle.toggle().unwrap();
        clock.advance_secs(60);
        let poll = cycle.poll().unwrap();
        assert_eq!(poll.status.text, "24:00");
        assert_eq!(poll.status.class, "pomodoro-work-active");

        cycle.toggle().unwrap();
        let reloaded = PomodoroCycle::load(&store, &clock, &config);
        assert!(!reloaded.state().active);
    }

    #[test]
    fn expired_work_moves_to_short_break_once() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path());
        let clock = ManualClock::new(Utc::now());
        let config = PomodoroConfig::default();
        let mut cycle = PomodoroCycle::load(&store, &clock, &config);
        cycle.toggle().unwrap();

        clock.advance_secs(25 * 60 + 90);
        let poll = cycle.poll().unwrap();
        assert_eq!(poll.events.len(), 1);
        assert_eq!(poll.status.text, "Short break");
        assert_eq!(poll.status.class, "pomodoro-break");
        assert_eq!(cycle.state().completed_pomodoros, 1);

        let poll = cycle.poll().unwrap();
        assert!(poll.events.is_empty());
        assert_eq!(poll.status.text, "05:00");
        assert_eq!(poll.status.class, "pomodoro-break-active");
    }

    #[test]
    fn every_fourth_pomodoro_earns_a_long_break() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path());
        let clock = ManualClock::new(Utc::now());
        let config = PomodoroConfig::default();
        let mut cycle = PomodoroCycle::load(&store, &clock, &config);
        cycle.toggle().unwrap();

        let mut labels = Vec::new();
        for _ in 0..8 {
            clock.advance_secs(cycle.state().duration as i64);
            labels.push(cycle.poll().unwrap().status.text);
        }
        assert_eq!(
            labels,
            [
                "Short break", "Focus time", "Short break", "Focus time", "Short break",
                "Focus time", "Long break", "Focus time"
            ]
        );
        assert_eq!(cycle.state().completed_pomodoros, 4);
    }

    #[test]
    fn start_break_uses_short_break_length() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path());
        let clock = ManualClock::new(Utc::now());
        let config = PomodoroConfig::default();
        let mut cycle = PomodoroCycle::load(&store, &clock, &config);
        cycle.start_break().unwrap();
        assert_eq!(cycle.state().mode, PomodoroPhase::Break);
        assert_eq!(cycle.state().duration, 300);
        cycle.end().unwrap();
        assert!(!cycle.state().active);
    }
}
