//! Productivity store: achievements, daily stats, session log, goals,
//! habits and notes, plus the bridge the timer engine calls into.
//!
//! Each method is a read-modify-write of the files it touches. The files are
//! written one after another, so a crash in between can lose a point award
//! while the session record is already closed. Nothing retries it.

use std::path::Path;

use chrono::NaiveDate;
use uuid::Uuid;

use super::achievements::{
    AchievementState, FIRST_GOAL, FOCUSED_MIND, FOCUSED_MIND_SESSIONS, HABIT_MASTER,
    HABIT_MASTER_STREAK, NOTE_TAKER, NOTE_TAKER_NOTES,
};
use super::analytics::{Analytics, SessionRecord};
use super::export::DataExport;
use super::goals::{GoalBook, NewGoal};
use super::habits::HabitBook;
use super::notes::{NewNote, NoteBook};
use super::stats::DailyStats;
use crate::clock::Clock;
use crate::error::{CoreError, Result, ValidationError};
use crate::events::Event;
use crate::status::WaybarStatus;
use crate::storage::{
    ProductivityConfig, StateStore, ACHIEVEMENTS_FILE, ANALYTICS_FILE, DAILY_STATS_FILE,
    GOALS_FILE, HABITS_FILE, NOTES_FILE,
};
use crate::timer::{TimerKind, TimerMode, TimerState};

/// How a focus/break session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    Completed,
    Interrupted,
}

pub struct ProductivityTracker<'a> {
    store: &'a StateStore,
    clock: &'a dyn Clock,
    config: &'a ProductivityConfig,
}

impl<'a> ProductivityTracker<'a> {
    pub fn new(store: &'a StateStore, clock: &'a dyn Clock, config: &'a ProductivityConfig) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }

    // ── Loading ──────────────────────────────────────────────────────

    pub fn achievements(&self) -> AchievementState {
        let mut state: AchievementState = self.store.load(ACHIEVEMENTS_FILE);
        state.normalize();
        state
    }

    pub fn daily_stats(&self) -> DailyStats {
        let mut stats: DailyStats = self.store.load(DAILY_STATS_FILE);
        stats.rollover(self.clock.today());
        stats
    }

    pub fn analytics(&self) -> Analytics {
        self.store.load(ANALYTICS_FILE)
    }

    pub fn goals(&self) -> GoalBook {
        self.store.load(GOALS_FILE)
    }

    pub fn habits(&self) -> HabitBook {
        self.store.load(HABITS_FILE)
    }

    pub fn notes(&self) -> NoteBook {
        self.store.load(NOTES_FILE)
    }

    fn award(&self, points: u64, reason: &str) -> Result<Vec<Event>> {
        let mut achievements = self.achievements();
        let events = achievements.add_points(points, reason, self.clock.now());
        self.store.save(ACHIEVEMENTS_FILE, &achievements)?;
        Ok(events)
    }

    fn unlock(&self, id: &str) -> Result<Vec<Event>> {
        let mut achievements = self.achievements();
        let events = achievements.unlock(id, self.clock.now());
        if !events.is_empty() {
            self.store.save(ACHIEVEMENTS_FILE, &achievements)?;
        }
        Ok(events)
    }

    // ── Session bridge ───────────────────────────────────────────────

    /// Append an open session record and return its id.
    pub fn open_session(&self, name: &str, kind: TimerKind, planned_secs: u64) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        let mut analytics = self.analytics();
        analytics.push(SessionRecord {
            id: id.clone(),
            name: name.to_string(),
            kind,
            planned_duration: planned_secs as f64 / 60.0,
            start_time: self.clock.now(),
            completed: false,
            interrupted: false,
            actual_duration: None,
            end_time: None,
        });
        self.store.save(ANALYTICS_FILE, &analytics)?;
        tracing::debug!("opened {} session {id}", kind.as_str());
        Ok(id)
    }

    /// Close a session record once and apply its rewards.
    ///
    /// A completed focus session awards points and focus minutes; a
    /// completed break adds break minutes. Interrupted sessions only get
    /// their record closed. Already-closed or unknown ids are ignored.
    pub fn close_session(
        &self,
        id: &str,
        outcome: SessionOutcome,
        elapsed_secs: f64,
    ) -> Result<Vec<Event>> {
        let mut analytics = self.analytics();
        let Some(record) = analytics.find_mut(id) else {
            tracing::warn!("session {id} not found in analytics");
            return Ok(Vec::new());
        };
        if !record.is_open() {
            return Ok(Vec::new());
        }

        let minutes = elapsed_secs.max(0.0) / 60.0;
        let completed = outcome == SessionOutcome::Completed;
        record.completed = completed;
        record.interrupted = !completed;
        record.actual_duration = Some(minutes);
        record.end_time = Some(self.clock.now());
        let kind = record.kind;
        self.store.save(ANALYTICS_FILE, &analytics)?;

        if !completed {
            return Ok(Vec::new());
        }

        let mut stats = self.daily_stats();
        let mut events = Vec::new();
        match kind {
            TimerKind::Focus => {
                stats.focus_time += minutes.round() as u64;
                stats.focus_sessions += 1;
                self.store.save(DAILY_STATS_FILE, &stats)?;
                events.extend(self.award(self.config.focus_points, "focus session")?);
                if stats.focus_sessions >= FOCUSED_MIND_SESSIONS {
                    events.extend(self.unlock(FOCUSED_MIND)?);
                }
            }
            TimerKind::Break => {
                stats.break_time += minutes.round() as u64;
                self.store.save(DAILY_STATS_FILE, &stats)?;
            }
            TimerKind::General => {}
        }
        Ok(events)
    }

    // ── Goals ────────────────────────────────────────────────────────

    pub fn add_goal(&self, new: NewGoal) -> Result<Vec<Event>> {
        let today = self.clock.today();
        let mut book = self.goals();
        let title = book.add(new, today).title.clone();
        let first = book.goals.len() == 1;
        self.store.save(GOALS_FILE, &book)?;

        let mut events = vec![Event::GoalAdded {
            title,
            at: self.clock.now(),
        }];
        if first {
            events.extend(self.unlock(FIRST_GOAL)?);
        }
        Ok(events)
    }

    pub fn update_goal_progress(&self, id: u64, value: u64) -> Result<Vec<Event>> {
        let today = self.clock.today();
        let mut book = self.goals();
        let goal = book
            .get_mut(id)
            .ok_or(ValidationError::NotFound { kind: "goal", id })?;
        let completed = goal.set_progress(value, today);
        let title = goal.title.clone();
        self.store.save(GOALS_FILE, &book)?;

        if !completed {
            return Ok(Vec::new());
        }
        let mut stats = self.daily_stats();
        stats.goals_completed += 1;
        self.store.save(DAILY_STATS_FILE, &stats)?;

        let mut events = vec![Event::GoalCompleted {
            title,
            at: self.clock.now(),
        }];
        events.extend(self.award(self.config.goal_points, "goal completed")?);
        Ok(events)
    }

    // ── Habits ───────────────────────────────────────────────────────

    pub fn add_habit(&self, name: &str, description: &str) -> Result<Vec<Event>> {
        let mut book = self.habits();
        book.add(name, description, self.clock.today());
        self.store.save(HABITS_FILE, &book)?;
        Ok(vec![Event::HabitAdded {
            name: name.to_string(),
            at: self.clock.now(),
        }])
    }

    pub fn complete_habit(&self, id: u64) -> Result<Vec<Event>> {
        let today = self.clock.today();
        let mut book = self.habits();
        let habit = book
            .get_mut(id)
            .ok_or(ValidationError::NotFound { kind: "habit", id })?;
        if !habit.complete(today) {
            return Ok(Vec::new());
        }
        let name = habit.name.clone();
        let streak = habit.streak;
        self.store.save(HABITS_FILE, &book)?;

        let mut stats = self.daily_stats();
        stats.habits_completed += 1;
        self.store.save(DAILY_STATS_FILE, &stats)?;

        let mut events = Vec::new();
        if streak >= HABIT_MASTER_STREAK {
            events.extend(self.unlock(HABIT_MASTER)?);
        }
        events.push(Event::HabitCompleted {
            name,
            streak,
            at: self.clock.now(),
        });
        events.extend(self.award(self.config.habit_points, "habit completed")?);
        Ok(events)
    }

    // ── Notes ────────────────────────────────────────────────────────

    pub fn add_note(&self, new: NewNote) -> Result<Vec<Event>> {
        let now = self.clock.now();
        let mut book = self.notes();
        let title = book.add(new, now).title.clone();
        let active = book.active().count();
        self.store.save(NOTES_FILE, &book)?;

        let mut events = vec![Event::NoteAdded { title, at: now }];
        if active >= NOTE_TAKER_NOTES {
            events.extend(self.unlock(NOTE_TAKER)?);
        }
        Ok(events)
    }

    pub fn archive_note(&self, id: u64) -> Result<Vec<Event>> {
        self.set_note_archived(id, true)
    }

    pub fn unarchive_note(&self, id: u64) -> Result<Vec<Event>> {
        self.set_note_archived(id, false)
    }

    fn set_note_archived(&self, id: u64, archived: bool) -> Result<Vec<Event>> {
        let now = self.clock.now();
        let mut book = self.notes();
        let note = book
            .get_mut(id)
            .ok_or(ValidationError::NotFound { kind: "note", id })?;
        if !note.set_archived(archived, now) {
            return Ok(Vec::new());
        }
        let title = note.title.clone();
        let active = book.active().count();
        self.store.save(NOTES_FILE, &book)?;

        let mut events = vec![Event::NoteArchived {
            title,
            archived,
            at: now,
        }];
        if !archived && active >= NOTE_TAKER_NOTES {
            events.extend(self.unlock(NOTE_TAKER)?);
        }
        Ok(events)
    }

    // ── Export / import ──────────────────────────────────────────────

    /// Write every productivity record to one JSON file at `path`.
    pub fn export_data(&self, path: &Path) -> Result<()> {
        let export = DataExport {
            export_date: Some(self.clock.now()),
            goals: Some(self.goals()),
            achievements: Some(self.achievements()),
            habits: Some(self.habits()),
            notes: Some(self.notes()),
            analytics: Some(self.analytics()),
            daily_stats: Some(self.daily_stats()),
        };
        let json = serde_json::to_string_pretty(&export)?;
        std::fs::write(path, json).map_err(|e| CoreError::io(path, e))?;
        tracing::info!("exported productivity data to {}", path.display());
        Ok(())
    }

    /// Restore the records present in an export file. The whole file is
    /// parsed before anything is written; returns the restored sections.
    pub fn import_data(&self, path: &Path) -> Result<Vec<&'static str>> {
        let raw = std::fs::read_to_string(path).map_err(|e| CoreError::io(path, e))?;
        let export: DataExport = serde_json::from_str(&raw)?;
        let sections = export.sections();

        if let Some(goals) = &export.goals {
            self.store.save(GOALS_FILE, goals)?;
        }
        if let Some(achievements) = &export.achievements {
            self.store.save(ACHIEVEMENTS_FILE, achievements)?;
        }
        if let Some(habits) = &export.habits {
            self.store.save(HABITS_FILE, habits)?;
        }
        if let Some(notes) = &export.notes {
            self.store.save(NOTES_FILE, notes)?;
        }
        if let Some(analytics) = &export.analytics {
            self.store.save(ANALYTICS_FILE, analytics)?;
        }
        if let Some(stats) = &export.daily_stats {
            self.store.save(DAILY_STATS_FILE, stats)?;
        }
        tracing::info!("imported {} from {}", sections.join(", "), path.display());
        Ok(sections)
    }

    // ── Status ───────────────────────────────────────────────────────

    /// Panel line for the productivity module. `timer` is the current timer
    /// record, used to show a running focus or break session.
    pub fn status(&self, timer: &TimerState) -> Result<WaybarStatus> {
        let today = self.clock.today();
        let mut stats: DailyStats = self.store.load(DAILY_STATS_FILE);
        if stats.rollover(today) {
            self.store.save(DAILY_STATS_FILE, &stats)?;
        }
        let achievements = self.achievements();
        let goals = self.goals();
        let habits = self.habits();
        let notes = self.notes();

        Ok(render_status(
            &StatusInputs {
                today,
                now_epoch: self.clock.epoch_secs(),
                achievements: &achievements,
                stats: &stats,
                goals: &goals,
                habits: &habits,
                notes: &notes,
                timer,
            },
        ))
    }

    /// Multi-line summary of today's numbers.
    pub fn summary(&self) -> String {
        let stats = self.daily_stats();
        let achievements = self.achievements();
        let goals = self.goals();
        let habits = self.habits();
        let today = self.clock.today();

        let habits_done = habits.active().filter(|h| h.done_on(today)).count();
        let habits_total = habits.active().count();
        format!(
            "📊 Daily Summary - {today}\n\n\
             🎯 Goals completed: {}\n\
             ✅ Habits: {habits_done}/{habits_total}\n\
             🧠 Focus time: {}min ({} sessions)\n\
             ☕ Break time: {}min\n\
             📈 Open goals: {}\n\n\
             🏆 Level: {} | Points: {}",
            stats.goals_completed,
            stats.focus_time,
            stats.focus_sessions,
            stats.break_time,
            goals.active().count(),
            achievements.level,
            achievements.points,
        )
    }
}

struct StatusInputs<'s> {
    today: NaiveDate,
    now_epoch: f64,
    achievements: &'s AchievementState,
    stats: &'s DailyStats,
    goals: &'s GoalBook,
    habits: &'s HabitBook,
    notes: &'s NoteBook,
    timer: &'s TimerState,
}

fn render_status(input: &StatusInputs<'_>) -> WaybarStatus {
    let active_goals = input.goals.active().count();
    let active_habits = input.habits.active().count();
    let active_notes = input.notes.active().count();
    let urgent = input
        .goals
        .goals
        .iter()
        .filter(|g| g.is_urgent(input.today))
        .count()
        + input
            .habits
            .habits
            .iter()
            .filter(|h| h.is_due(input.today))
            .count();

    let level = input.achievements.level;
    let (text, class) = if urgent > 0 {
        (format!("🔥 {urgent}"), "productivity-urgent")
    } else if active_goals > 0 || active_habits > 0 {
        (format!("⚡ L{level}"), "productivity-active")
    } else {
        (format!("✨ L{level}"), "productivity-idle")
    };

    let mut tooltip = format!(
        "Productivity Manager - Level {level}\nPoints: {}\n\n",
        input.achievements.points
    );

    let timer = input.timer;
    if timer.mode == TimerMode::Timer && timer.timer_type.is_session() {
        let elapsed = timer.elapsed(input.now_epoch) / 60.0;
        let planned = timer.duration as f64 / 60.0;
        let label = match timer.timer_type {
            TimerKind::Focus => "🧠 Focus",
            _ => "☕ Break",
        };
        tooltip.push_str(&format!(
            "{label}: {elapsed:.1}/{planned:.0}min ({})\n\n",
            timer.timer_name
        ));
    }

    let stats = input.stats;
    tooltip.push_str(&format!(
        "📊 Today's Stats:\n\
         Goals completed: {}\n\
         Habits completed: {}\n\
         Focus time: {}min\n\
         Break time: {}min\n\n\
         📈 Active Items:\n\
         Goals: {active_goals}\n\
         Habits: {active_habits}\n\
         Notes: {active_notes}",
        stats.goals_completed, stats.habits_completed, stats.focus_time, stats.break_time,
    ));
    if urgent > 0 {
        tooltip.push_str(&format!("\n\n⚠️ {urgent} urgent items need attention!"));
    }

    WaybarStatus::new(text, tooltip, class)
}
