//! Timer engine implementation.
//!
//! The engine is a wall-clock state machine over a persisted [`TimerState`].
//! It has no thread of its own: a countdown that ran out is noticed on the
//! next [`poll`](TimerEngine::poll), however late that comes.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Timer <-> Timer(paused) -> Idle     (completion on poll, or stop)
//! Idle -> Stopwatch <-> Stopwatch(paused) -> Idle   (stop)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::load(&store, &clock, &config);
//! engine.start(1500, "Pomodoro", TimerKind::Focus)?;
//! // On every panel refresh:
//! let poll = engine.poll()?; // poll.events holds TimerCompleted once
//! ```

use serde::Serialize;

use super::state::{TimerKind, TimerMode, TimerState};
use crate::alarm::{AlarmEntry, AlarmScheduler};
use crate::clock::Clock;
use crate::error::Result;
use crate::events::Event;
use crate::productivity::{ProductivityTracker, SessionOutcome};
use crate::storage::{Config, StateStore, TIMER_FILE};

/// Clock-derived view of the timer at one instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimerSnapshot {
    pub mode: TimerMode,
    pub kind: TimerKind,
    pub name: String,
    pub elapsed: f64,
    pub remaining: f64,
    pub duration: u64,
    pub progress_pct: f64,
    pub paused: bool,
}

/// Result of one status poll.
#[derive(Debug, Clone)]
pub struct Poll {
    pub events: Vec<Event>,
    pub snapshot: TimerSnapshot,
    pub next_alarm: Option<AlarmEntry>,
}

pub struct TimerEngine<'a> {
    store: &'a StateStore,
    clock: &'a dyn Clock,
    sessions: ProductivityTracker<'a>,
    state: TimerState,
}

impl<'a> TimerEngine<'a> {
    /// Load the persisted timer. A missing or unreadable file means idle.
    pub fn load(store: &'a StateStore, clock: &'a dyn Clock, config: &'a Config) -> Self {
        Self {
            store,
            clock,
            sessions: ProductivityTracker::new(store, clock, &config.productivity),
            state: store.load(TIMER_FILE),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        let now = self.clock.epoch_secs();
        let s = &self.state;
        TimerSnapshot {
            mode: s.mode,
            kind: s.timer_type,
            name: s.timer_name.clone(),
            elapsed: s.elapsed(now),
            remaining: s.remaining(now),
            duration: s.duration,
            progress_pct: s.progress_pct(now),
            paused: s.paused,
        }
    }

    fn save(&self) -> Result<()> {
        self.store.save(TIMER_FILE, &self.state)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start a countdown, replacing whatever was running.
    ///
    /// Focus and break countdowns open a session record. A countdown that
    /// already ran out is completed first; a session still running is closed
    /// as interrupted.
    pub fn start(&mut self, duration_secs: u64, name: &str, kind: TimerKind) -> Result<Vec<Event>> {
        let mut events = self.complete_if_due()?;
        events.extend(self.abandon_session());
        let now = self.clock.epoch_secs();
        self.state = TimerState::countdown(now, duration_secs, name, kind);

        if kind.is_session() {
            match self.sessions.open_session(name, kind, duration_secs) {
                Ok(id) => self.state.session_id = Some(id),
                Err(e) => tracing::warn!("could not open {} session: {e}", kind.as_str()),
            }
        }
        self.save()?;
        tracing::debug!("timer '{name}' started for {duration_secs}s ({})", kind.as_str());

        events.push(Event::TimerStarted {
            name: name.to_string(),
            kind,
            duration_secs,
            at: self.clock.now(),
        });
        Ok(events)
    }

    pub fn start_stopwatch(&mut self, name: &str) -> Result<Vec<Event>> {
        let mut events = self.complete_if_due()?;
        events.extend(self.abandon_session());
        self.state = TimerState::stopwatch(self.clock.epoch_secs(), name);
        self.save()?;
        tracing::debug!("stopwatch '{name}' started");

        events.push(Event::StopwatchStarted {
            name: name.to_string(),
            at: self.clock.now(),
        });
        Ok(events)
    }

    /// Pause a running timer or resume a paused one. Idle does nothing.
    pub fn toggle_pause(&mut self) -> Result<Vec<Event>> {
        if self.state.is_idle() {
            return Ok(Vec::new());
        }
        let now = self.clock.epoch_secs();
        let name = self.state.timer_name.clone();
        let at = self.clock.now();
        let event = if self.state.paused {
            self.state.resume(now);
            Event::TimerResumed { name, at }
        } else {
            self.state.pause(now);
            Event::TimerPaused { name, at }
        };
        self.save()?;
        Ok(vec![event])
    }

    /// Stop on the user's request. The session, if any, is interrupted.
    pub fn stop(&mut self) -> Result<Vec<Event>> {
        if self.state.is_idle() {
            return Ok(Vec::new());
        }
        let mut events = vec![Event::TimerStopped {
            name: self.state.timer_name.clone(),
            at: self.clock.now(),
        }];
        events.extend(self.finish(SessionOutcome::Interrupted)?);
        Ok(events)
    }

    /// Fire due alarms, then complete the countdown if it ran out.
    pub fn poll(&mut self) -> Result<Poll> {
        let mut alarms = AlarmScheduler::load(self.store, self.clock);
        let mut events = alarms.check_and_fire()?;
        events.extend(self.complete_if_due()?);

        Ok(Poll {
            events,
            snapshot: self.snapshot(),
            next_alarm: alarms.next_alarm().cloned(),
        })
    }

    // ── Internals ────────────────────────────────────────────────────

    /// Complete a countdown whose deadline has passed, even if no poll saw it.
    fn complete_if_due(&mut self) -> Result<Vec<Event>> {
        if !self.state.is_due(self.clock.epoch_secs()) {
            return Ok(Vec::new());
        }
        tracing::info!("timer '{}' completed", self.state.timer_name);
        let mut events = vec![Event::TimerCompleted {
            name: self.state.timer_name.clone(),
            kind: self.state.timer_type,
            at: self.clock.now(),
        }];
        events.extend(self.finish(SessionOutcome::Completed)?);
        Ok(events)
    }

    /// Reset to idle, then settle the session.
    ///
    /// The idle state is written first so a failure below can never make
    /// the same completion fire twice; the session bookkeeping is best
    /// effort and only logged when it fails.
    fn finish(&mut self, outcome: SessionOutcome) -> Result<Vec<Event>> {
        let now = self.clock.epoch_secs();
        let mut elapsed = self.state.elapsed(now);
        if outcome == SessionOutcome::Completed {
            elapsed = elapsed.min(self.state.duration as f64);
        }
        let session = self.state.session_id.take();
        self.state = TimerState::default();
        self.save()?;

        let Some(id) = session else {
            return Ok(Vec::new());
        };
        match self.sessions.close_session(&id, outcome, elapsed) {
            Ok(events) => Ok(events),
            Err(e) => {
                tracing::warn!("could not record session {id}: {e}");
                Ok(Vec::new())
            }
        }
    }

    /// Close the running session as interrupted before a restart.
    fn abandon_session(&mut self) -> Vec<Event> {
        let Some(id) = self.state.session_id.take() else {
            return Vec::new();
        };
        let elapsed = self.state.elapsed(self.clock.epoch_secs());
        tracing::debug!("session {id} replaced by a new timer");
        self.sessions
            .close_session(&id, SessionOutcome::Interrupted, elapsed)
            .unwrap_or_else(|e| {
                tracing::warn!("could not close session {id}: {e}");
                Vec::new()
            })
    }
}
