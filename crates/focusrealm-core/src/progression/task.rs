//! Tasks and the task ranking heuristic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub const DEFAULT_ESTIMATED_MIN: u32 = 25;
pub const MAX_ESTIMATED_MIN: u32 = 600;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn weight(self) -> f64 {
        match self {
            Priority::Low => 1.0,
            Priority::Medium => 2.0,
            Priority::High => 3.0,
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(ValidationError::InvalidValue {
                field: "priority".into(),
                message: format!("'{other}' is not one of low, medium, high"),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn weight(self) -> f64 {
        match self {
            Difficulty::Easy => 1.0,
            Difficulty::Medium => 2.0,
            Difficulty::Hard => 3.0,
        }
    }

    /// XP granted for completing a task of this difficulty.
    pub fn xp_reward(self) -> u64 {
        match self {
            Difficulty::Easy => 10,
            Difficulty::Medium => 20,
            Difficulty::Hard => 30,
        }
    }
}

impl std::str::FromStr for Difficulty {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(ValidationError::InvalidValue {
                field: "difficulty".into(),
                message: format!("'{other}' is not one of easy, medium, hard"),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub priority: Priority,
    /// Estimated effort in minutes.
    pub estimated_time: u32,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Ranking score; higher means "do this first".
    pub fn score(&self) -> f64 {
        0.4 * self.priority.weight()
            + 0.3 * (4.0 - self.difficulty.weight())
            + 0.3 * ((60.0 - f64::from(self.estimated_time)) / 60.0)
    }
}

/// Fields supplied when creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub estimated_time: u32,
    pub difficulty: Difficulty,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            priority: Priority::Medium,
            estimated_time: DEFAULT_ESTIMATED_MIN,
            difficulty: Difficulty::Medium,
        }
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn estimated_time(mut self, minutes: u32) -> Self {
        self.estimated_time = minutes;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Validate and turn into a stored task with the given id.
    pub(crate) fn into_task(self, id: String) -> Result<Task, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        let estimated_time = match self.estimated_time {
            0 => DEFAULT_ESTIMATED_MIN,
            n => n.min(MAX_ESTIMATED_MIN),
        };
        let description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        Ok(Task {
            id,
            title: title.to_string(),
            description,
            priority: self.priority,
            estimated_time,
            difficulty: self.difficulty,
            completed: false,
            completed_at: None,
        })
    }
}

/// Incomplete tasks ordered by descending score.
///
/// The sort is stable, so tasks with equal scores keep their input order.
pub fn rank_tasks(tasks: &[Task]) -> Vec<&Task> {
    let mut ranked: Vec<&Task> = tasks.iter().filter(|t| !t.completed).collect();
    ranked.sort_by(|a, b| b.score().total_cmp(&a.score()));
    ranked
}
