//! Read-only projections over the task list.
//!
//! # Responsibility
//! - Derive counts and filtered views for presentation layers.
//! - Render short human-readable labels (task summary, relative time).
//!
//! # Invariants
//! - Projections are recomputed on demand and never cached.
//! - `total == completed + remaining` for every computed `TaskCounts`.

use crate::model::task::Task;
use chrono::{DateTime, Utc};

/// Aggregate counts for one task list state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskCounts {
    pub total: usize,
    pub completed: usize,
    pub remaining: usize,
}

impl TaskCounts {
    /// Counts `tasks` in a single pass.
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let completed = tasks.iter().filter(|task| task.completed).count();
        Self {
            total: tasks.len(),
            completed,
            remaining: tasks.len() - completed,
        }
    }

    /// Footer label: `0 tasks`, `1 task`, `3 tasks`, or `2 of 5 remaining`.
    pub fn summary_label(&self) -> String {
        if self.total == 0 {
            "0 tasks".to_string()
        } else if self.completed == 0 {
            let noun = if self.total == 1 { "task" } else { "tasks" };
            format!("{} {noun}", self.total)
        } else {
            format!("{} of {} remaining", self.remaining, self.total)
        }
    }
}

/// Subset selector for list views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl TaskFilter {
    pub fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Active => !task.completed,
            Self::Completed => task.completed,
        }
    }
}

/// Formats `timestamp` relative to `now` the way the widget footer shows it.
///
/// Older than a week falls back to the calendar date (`YYYY-MM-DD`, UTC).
pub fn format_relative(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - timestamp).num_minutes();
    let hours = minutes / 60;
    let days = hours / 24;

    if minutes < 1 {
        "just now".to_string()
    } else if minutes < 60 {
        format!("{minutes}m ago")
    } else if hours < 24 {
        format!("{hours}h ago")
    } else if days < 7 {
        format!("{days}d ago")
    } else {
        timestamp.format("%Y-%m-%d").to_string()
    }
}
