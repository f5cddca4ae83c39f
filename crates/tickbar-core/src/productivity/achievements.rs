//! Points, levels and achievement unlocking.
//!
//! Every 100 points is one level. Unlocking an achievement awards its
//! points, which may level up, which at level 10 unlocks another
//! achievement; each achievement unlocks at most once, so the chain ends.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::events::Event;

pub const FIRST_GOAL: &str = "first_goal";
pub const GOAL_STREAK_7: &str = "goal_streak_7";
pub const HABIT_MASTER: &str = "habit_master";
pub const FOCUSED_MIND: &str = "focused_mind";
pub const NOTE_TAKER: &str = "note_taker";
pub const PRODUCTIVITY_GURU: &str = "productivity_guru";

pub const POINTS_PER_LEVEL: u64 = 100;
pub const GURU_LEVEL: u64 = 10;
pub const FOCUSED_MIND_SESSIONS: u32 = 5;
pub const HABIT_MASTER_STREAK: u32 = 30;
pub const NOTE_TAKER_NOTES: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AchievementDef {
    pub name: String,
    pub description: String,
    pub points: u64,
    pub icon: String,
    #[serde(default)]
    pub unlocked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnlockedAchievement {
    pub id: String,
    #[serde(with = "super::timestamp")]
    pub unlocked_date: DateTime<Utc>,
    pub name: String,
    pub description: String,
    pub points: u64,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AchievementState {
    pub unlocked: Vec<UnlockedAchievement>,
    pub points: u64,
    pub level: u64,
    pub available_achievements: BTreeMap<String, AchievementDef>,
}

impl Default for AchievementState {
    fn default() -> Self {
        Self {
            unlocked: Vec::new(),
            points: 0,
            level: 1,
            available_achievements: default_achievements(),
        }
    }
}

pub fn level_for(points: u64) -> u64 {
    points / POINTS_PER_LEVEL + 1
}

fn def(name: &str, description: &str, points: u64, icon: &str) -> AchievementDef {
    AchievementDef {
        name: name.into(),
        description: description.into(),
        points,
        icon: icon.into(),
        unlocked: false,
    }
}

pub fn default_achievements() -> BTreeMap<String, AchievementDef> {
    BTreeMap::from([
        (
            FIRST_GOAL.to_string(),
            def("Goal Setter", "Create your first goal", 10, "🎯"),
        ),
        (
            GOAL_STREAK_7.to_string(),
            def("Week Warrior", "Complete goals for 7 days straight", 50, "🔥"),
        ),
        (
            HABIT_MASTER.to_string(),
            def("Habit Master", "Maintain a habit for 30 days", 100, "👑"),
        ),
        (
            FOCUSED_MIND.to_string(),
            def("Focused Mind", "Complete 5 focus sessions in a day", 25, "🧠"),
        ),
        (
            NOTE_TAKER.to_string(),
            def("Note Taker", "Create 50 notes", 30, "📝"),
        ),
        (
            PRODUCTIVITY_GURU.to_string(),
            def("Productivity Guru", "Reach level 10", 200, "🏆"),
        ),
    ])
}

impl AchievementState {
    /// Add definitions that older files lack and re-derive the level.
    pub fn normalize(&mut self) {
        for (id, def) in default_achievements() {
            self.available_achievements.entry(id).or_insert(def);
        }
        self.level = self.level.max(level_for(self.points));
    }

    pub fn is_unlocked(&self, id: &str) -> bool {
        self.available_achievements
            .get(id)
            .is_some_and(|def| def.unlocked)
    }

    /// Add points, emitting `LevelUp` when the level increases.
    pub fn add_points(&mut self, points: u64, reason: &str, at: DateTime<Utc>) -> Vec<Event> {
        let mut events = Vec::new();
        let old_level = self.level;
        self.points += points;
        events.push(Event::PointsAwarded {
            points,
            total: self.points,
            reason: reason.to_string(),
            at,
        });

        let new_level = level_for(self.points);
        if new_level > old_level {
            self.level = new_level;
            tracing::info!("level up: {old_level} -> {new_level}");
            events.push(Event::LevelUp {
                level: new_level,
                at,
            });
            if new_level >= GURU_LEVEL {
                events.extend(self.unlock(PRODUCTIVITY_GURU, at));
            }
        }
        events
    }

    /// Unlock an achievement once. Unknown ids are ignored.
    pub fn unlock(&mut self, id: &str, at: DateTime<Utc>) -> Vec<Event> {
        let Some(def) = self.available_achievements.get_mut(id) else {
            return Vec::new();
        };
        if def.unlocked {
            return Vec::new();
        }
        def.unlocked = true;
        let def = def.clone();

        self.unlocked.push(UnlockedAchievement {
            id: id.to_string(),
            unlocked_date: at,
            name: def.name.clone(),
            description: def.description.clone(),
            points: def.points,
            icon: def.icon.clone(),
        });

        let mut events = vec![Event::AchievementUnlocked {
            id: id.to_string(),
            name: def.name,
            icon: def.icon,
            description: def.description,
            at,
        }];
        events.extend(self.add_points(def.points, &format!("achievement {id}"), at));
        events
    }
}
