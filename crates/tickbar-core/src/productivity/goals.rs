use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Parse a `YYYY-MM-DD` deadline.
pub fn parse_date(input: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate(input.to_string()))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_category")]
    pub category: String,
    pub created_date: NaiveDate,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    #[serde(default = "default_target")]
    pub target_value: u64,
    #[serde(default)]
    pub current_value: u64,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub completed_date: Option<NaiveDate>,
}

fn default_category() -> String {
    "Personal".into()
}

fn default_target() -> u64 {
    1
}

impl Goal {
    /// Open goal whose deadline is today or already passed.
    pub fn is_urgent(&self, today: NaiveDate) -> bool {
        !self.completed && self.deadline.is_some_and(|d| d <= today)
    }

    /// Set progress, clamped to the target. Returns true if this call
    /// completed the goal.
    pub fn set_progress(&mut self, value: u64, today: NaiveDate) -> bool {
        self.current_value = value.min(self.target_value);
        if self.current_value >= self.target_value && !self.completed {
            self.completed = true;
            self.completed_date = Some(today);
            return true;
        }
        false
    }
}

/// Input for a new goal.
#[derive(Debug, Clone)]
pub struct NewGoal {
    pub title: String,
    pub description: String,
    pub category: String,
    pub deadline: Option<NaiveDate>,
    pub target_value: u64,
}

impl NewGoal {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            category: default_category(),
            deadline: None,
            target_value: default_target(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoalBook {
    pub goals: Vec<Goal>,
    pub categories: Vec<String>,
    pub next_id: u64,
}

impl Default for GoalBook {
    fn default() -> Self {
        Self {
            goals: Vec::new(),
            categories: ["Work", "Personal", "Health", "Learning", "Finance"]
                .into_iter()
                .map(String::from)
                .collect(),
            next_id: 1,
        }
    }
}

impl GoalBook {
    pub fn add(&mut self, new: NewGoal, today: NaiveDate) -> &Goal {
        let goal = Goal {
            id: self.next_id,
            title: new.title,
            description: new.description,
            category: new.category,
            created_date: today,
            deadline: new.deadline,
            target_value: new.target_value.max(1),
            current_value: 0,
            completed: false,
            completed_date: None,
        };
        self.next_id += 1;
        self.goals.push(goal);
        &self.goals[self.goals.len() - 1]
    }

    pub fn get_mut(&mut self, id: u64) -> Option<&mut Goal> {
        self.goals.iter_mut().find(|g| g.id == id)
    }

    pub fn active(&self) -> impl Iterator<Item = &Goal> {
        self.goals.iter().filter(|g| !g.completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    #[test]
    fn parses_deadlines() {
        assert_eq!(parse_date("2024-06-30").unwrap(), day(30));
        assert_eq!(
            parse_date("30/06/2024"),
            Err(ValidationError::InvalidDate("30/06/2024".into()))
        );
    }

    #[test]
    fn ids_increase() {
        let mut book = GoalBook::default();
        assert_eq!(book.add(NewGoal::titled("a"), day(1)).id, 1);
        assert_eq!(book.add(NewGoal::titled("b"), day(1)).id, 2);
        assert_eq!(book.next_id, 3);
    }

    #[test]
    fn progress_completes_once_and_clamps() {
        let mut book = GoalBook::default();
        let mut new = NewGoal::titled("read");
        new.target_value = 3;
        book.add(new, day(1));
        let goal = book.get_mut(1).unwrap();
        assert!(!goal.set_progress(2, day(2)));
        assert!(goal.set_progress(9, day(3)));
        assert_eq!(goal.current_value, 3);
        assert_eq!(goal.completed_date, Some(day(3)));
        assert!(!goal.set_progress(3, day(4)));
    }

    #[test]
    fn urgency_follows_deadline() {
        let mut new = NewGoal::titled("ship");
        new.deadline = Some(day(10));
        let mut book = GoalBook::default();
        book.add(new, day(1));
        let goal = &book.goals[0];
        assert!(!goal.is_urgent(day(9)));
        assert!(goal.is_urgent(day(10)));
        assert!(goal.is_urgent(day(11)));
    }
}
