use super::{Record, UnknownVariant};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A task as returned by `/tasks`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: TaskStatus,
    /// Id of the user who created the task
    #[serde(default)]
    pub creator: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Record for Task {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Task {
    /// Only the creator may edit or delete a task.
    pub fn is_owned_by(&self, user_id: Option<&str>) -> bool {
        match (self.creator.as_deref(), user_id) {
            (Some(creator), Some(user)) => creator == user,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Pending,
    Done,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 2] = [TaskStatus::Pending, TaskStatus::Done];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Done => "done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownVariant::new("task status", s))
    }
}

/// Dashboard figures for one page of tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskStats {
    pub total: u64,
    pub completed: usize,
    pub pending: usize,
}

impl TaskStats {
    /// `total_tasks` is the server-side total across all pages.
    pub fn from_page(tasks: &[Task], total_tasks: u64) -> Self {
        let completed = tasks.iter().filter(|t| t.status == TaskStatus::Done).count();
        Self {
            total: total_tasks,
            completed,
            pending: tasks.len() - completed,
        }
    }

    /// Whole-percent completion rate, 0 when there are no tasks.
    pub fn completion_rate(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((self.completed as f64 / self.total as f64) * 100.0).round() as u32
    }
}
