use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_frequency")]
    pub frequency: String,
    #[serde(default = "default_reminder")]
    pub reminder_time: String,
    pub created_date: NaiveDate,
    #[serde(default)]
    pub streak: u32,
    #[serde(default)]
    pub longest_streak: u32,
    #[serde(default)]
    pub total_completions: u32,
    #[serde(default)]
    pub completion_dates: Vec<NaiveDate>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_frequency() -> String {
    "daily".into()
}

fn default_reminder() -> String {
    "20:00".into()
}

fn default_active() -> bool {
    true
}

impl Habit {
    pub fn done_on(&self, day: NaiveDate) -> bool {
        self.completion_dates.contains(&day)
    }

    /// Active habit not yet done today.
    pub fn is_due(&self, today: NaiveDate) -> bool {
        self.active && !self.done_on(today)
    }

    /// Mark done for `today`. Returns false if it already was.
    pub fn complete(&mut self, today: NaiveDate) -> bool {
        if self.done_on(today) {
            return false;
        }
        self.completion_dates.push(today);
        self.total_completions += 1;
        self.streak = streak_ending(&self.completion_dates, today);
        self.longest_streak = self.longest_streak.max(self.streak);
        true
    }
}

/// Consecutive completion days ending at `today`.
pub fn streak_ending(dates: &[NaiveDate], today: NaiveDate) -> u32 {
    let mut sorted: Vec<NaiveDate> = dates.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    sorted.dedup();

    let mut streak = 0;
    for (i, day) in sorted.iter().enumerate() {
        if *day == today - Duration::days(i as i64) {
            streak += 1;
        } else {
            break;
        }
    }
    streak
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HabitBook {
    pub habits: Vec<Habit>,
    pub next_id: u64,
}

impl Default for HabitBook {
    fn default() -> Self {
        Self {
            habits: Vec::new(),
            next_id: 1,
        }
    }
}

impl HabitBook {
    pub fn add(&mut self, name: &str, description: &str, today: NaiveDate) -> &Habit {
        let habit = Habit {
            id: self.next_id,
            name: name.to_string(),
            description: description.to_string(),
            frequency: default_frequency(),
            reminder_time: default_reminder(),
            created_date: today,
            streak: 0,
            longest_streak: 0,
            total_completions: 0,
            completion_dates: Vec::new(),
            active: true,
        };
        self.next_id += 1;
        self.habits.push(habit);
        &self.habits[self.habits.len() - 1]
    }

    pub fn get_mut(&mut self, id: u64) -> Option<&mut Habit> {
        self.habits.iter_mut().find(|h| h.id == id)
    }

    pub fn active(&self) -> impl Iterator<Item = &Habit> {
        self.habits.iter().filter(|h| h.active)
    }
}
