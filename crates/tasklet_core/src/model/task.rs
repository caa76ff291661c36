//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical todo record and its snapshot wire shape.
//! - Provide completion transitions that keep timestamps consistent.
//!
//! # Invariants
//! - `id` is non-nil, assigned once and never mutated.
//! - `text` is non-empty after trimming.
//! - `completed_at.is_some() == completed`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a task.
pub type TaskId = Uuid;

/// Validation errors for task construction and snapshot decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskValidationError {
    NilId,
    EmptyText,
    /// `completed` is true but no completion timestamp is present.
    MissingCompletedAt,
    /// A completion timestamp is present on an open task.
    UnexpectedCompletedAt,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "task id must not be nil"),
            Self::EmptyText => write!(f, "task text must not be empty"),
            Self::MissingCompletedAt => {
                write!(f, "completed task must carry completedAt")
            }
            Self::UnexpectedCompletedAt => {
                write!(f, "open task must not carry completedAt")
            }
        }
    }
}

impl Error for TaskValidationError {}

/// One todo entry.
///
/// Serialized with camelCase keys (`id`, `text`, `completed`, `createdAt`,
/// `completedAt`). Decoding runs [`Task::validate`], so a malformed record
/// never becomes a `Task`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "TaskRecord")]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Creates an open task with a generated id, stamped with the current time.
    ///
    /// Surrounding whitespace is trimmed from `text`.
    pub fn new(text: &str) -> Result<Self, TaskValidationError> {
        Self::with_id(Uuid::new_v4(), text, Utc::now())
    }

    /// Creates an open task with a caller-provided id and creation time.
    pub fn with_id(
        id: TaskId,
        text: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Self, TaskValidationError> {
        let task = Self {
            id,
            text: text.trim().to_string(),
            completed: false,
            created_at,
            completed_at: None,
        };
        task.validate()?;
        Ok(task)
    }

    /// Checks the record-level invariants.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.id.is_nil() {
            return Err(TaskValidationError::NilId);
        }
        if self.text.trim().is_empty() {
            return Err(TaskValidationError::EmptyText);
        }
        match (self.completed, self.completed_at) {
            (true, None) => Err(TaskValidationError::MissingCompletedAt),
            (false, Some(_)) => Err(TaskValidationError::UnexpectedCompletedAt),
            _ => Ok(()),
        }
    }

    /// Flips completion state, stamping or clearing `completed_at`.
    pub fn toggle(&mut self, now: DateTime<Utc>) {
        self.set_completed(!self.completed, now);
    }

    /// Sets completion state; the timestamp only moves on an actual transition.
    pub fn set_completed(&mut self, completed: bool, now: DateTime<Utc>) {
        if self.completed == completed {
            return;
        }
        self.completed = completed;
        self.completed_at = completed.then_some(now);
    }
}

/// Raw snapshot entry before validation.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskRecord {
    id: TaskId,
    text: String,
    #[serde(default)]
    completed: bool,
    created_at: DateTime<Utc>,
    #[serde(default)]
    completed_at: Option<DateTime<Utc>>,
}

impl TryFrom<TaskRecord> for Task {
    type Error = TaskValidationError;

    fn try_from(record: TaskRecord) -> Result<Self, Self::Error> {
        let task = Self {
            id: record.id,
            text: record.text,
            completed: record.completed,
            created_at: record.created_at,
            completed_at: record.completed_at,
        };
        task.validate()?;
        Ok(task)
    }
}
