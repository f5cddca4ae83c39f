//! Goals, habits, notes, achievements and the focus/break session log.

mod achievements;
mod analytics;
mod export;
mod goals;
mod habits;
mod notes;
mod stats;
pub mod timestamp;
mod tracker;

pub use achievements::{
    default_achievements, level_for, AchievementDef, AchievementState, UnlockedAchievement,
    FIRST_GOAL, FOCUSED_MIND, GOAL_STREAK_7, GURU_LEVEL, HABIT_MASTER, NOTE_TAKER,
    NOTE_TAKER_NOTES, POINTS_PER_LEVEL, PRODUCTIVITY_GURU,
};
pub use analytics::{Analytics, SessionRecord};
pub use export::DataExport;
pub use goals::{parse_date, Goal, GoalBook, NewGoal};
pub use habits::{streak_ending, Habit, HabitBook};
pub use notes::{NewNote, Note, NoteBook};
pub use stats::DailyStats;
pub use tracker::{ProductivityTracker, SessionOutcome};
