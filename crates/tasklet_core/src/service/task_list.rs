//! Task list controller.
//!
//! # Responsibility
//! - Own the newest-first task sequence and apply add/toggle/delete/clear.
//! - Mirror the full sequence into the settings store after each mutation.
//! - Notify subscribers with fresh counts once a change is applied.
//!
//! # Invariants
//! - Task ids are unique within the list.
//! - Every mutation writes one full snapshot under `tasks`; there are no
//!   partial or per-task writes.
//! - Store failures are logged and swallowed; memory stays authoritative.
//! - Unknown ids are silent no-ops: no write, no notification.

use crate::model::task::{Task, TaskId, TaskValidationError};
use crate::projection::{TaskCounts, TaskFilter};
use crate::store::{SettingsStore, StoreError};
use chrono::Utc;
use log::{debug, info, warn};
use serde_json::Value;
use std::collections::HashSet;
use std::time::Instant;
use uuid::Uuid;

/// Store key holding the task snapshot.
pub const TASKS_KEY: &str = "tasks";

/// What a controller operation changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskListChange {
    Loaded { count: usize },
    Added(TaskId),
    Toggled { id: TaskId, completed: bool },
    Deleted(TaskId),
    ClearedCompleted { removed: usize },
}

/// Notification delivered to subscribers after a change is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListEvent {
    pub change: TaskListChange,
    /// Counts recomputed after the change.
    pub counts: TaskCounts,
    /// Whether the snapshot written for this change reached the store.
    /// Always `false` for `Loaded`, which writes nothing.
    pub persisted: bool,
}

/// Handle returned by [`TaskListController::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&TaskListEvent)>;

/// Owner of the in-memory task list and its persisted mirror.
pub struct TaskListController<S: SettingsStore> {
    store: S,
    tasks: Vec<Task>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl<S: SettingsStore> TaskListController<S> {
    /// Creates an empty controller without reading the store.
    pub fn new(store: S) -> Self {
        Self {
            store,
            tasks: Vec::new(),
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Creates a controller hydrated from the store.
    pub fn open(store: S) -> Self {
        let mut controller = Self::new(store);
        controller.load();
        controller
    }

    /// Replaces the in-memory list with the stored snapshot.
    ///
    /// Never fails: a missing, unreadable or non-array snapshot loads as
    /// empty, and malformed or duplicate entries are skipped.
    /// Returns the number of tasks loaded.
    pub fn load(&mut self) -> usize {
        let started_at = Instant::now();
        let snapshot = match self.store.read(TASKS_KEY) {
            Ok(Some(value)) => value,
            Ok(None) => Value::Array(Vec::new()),
            Err(err) => {
                warn!(
                    "event=tasks_load module=task_list status=error error_code=store_read_failed error={err}"
                );
                Value::Array(Vec::new())
            }
        };

        self.tasks = decode_snapshot(snapshot);
        let count = self.tasks.len();
        info!(
            "event=tasks_load module=task_list status=ok count={} duration_ms={}",
            count,
            started_at.elapsed().as_millis()
        );
        self.notify(TaskListChange::Loaded { count }, false);
        count
    }

    /// Writes the full in-memory list to the store.
    ///
    /// Returns whether the snapshot reached the store. Failures are logged,
    /// never raised.
    pub fn persist(&self) -> bool {
        let result = serde_json::to_value(&self.tasks)
            .map_err(StoreError::from)
            .and_then(|snapshot| self.store.write(TASKS_KEY, &snapshot));
        match result {
            Ok(()) => {
                debug!(
                    "event=tasks_persist module=task_list status=ok count={}",
                    self.tasks.len()
                );
                true
            }
            Err(err) => {
                warn!(
                    "event=tasks_persist module=task_list status=error count={} error={}",
                    self.tasks.len(),
                    err
                );
                false
            }
        }
    }

    /// Best-effort final write before shutdown.
    pub fn flush(&self) -> bool {
        let persisted = self.persist();
        info!(
            "event=tasks_flush module=task_list status={} count={}",
            if persisted { "ok" } else { "error" },
            self.tasks.len()
        );
        persisted
    }

    /// Adds a task at the front of the list and returns it.
    ///
    /// # Errors
    /// - `EmptyText` when `text` is blank after trimming. Nothing is written.
    pub fn add(&mut self, text: &str) -> Result<Task, TaskValidationError> {
        let mut task = Task::new(text)?;
        while self.position(task.id).is_some() {
            task.id = Uuid::new_v4();
        }

        self.tasks.insert(0, task.clone());
        let persisted = self.persist();
        info!(
            "event=task_add module=task_list status=ok task_id={} total={}",
            task.id,
            self.tasks.len()
        );
        self.notify(TaskListChange::Added(task.id), persisted);
        Ok(task)
    }

    /// Flips completion of the task with `id` and returns its new state.
    ///
    /// Returns `None` for unknown ids.
    pub fn toggle(&mut self, id: TaskId) -> Option<Task> {
        let index = self.position(id)?;
        self.tasks[index].toggle(Utc::now());
        let task = self.tasks[index].clone();

        let persisted = self.persist();
        info!(
            "event=task_toggle module=task_list status=ok task_id={} completed={}",
            id, task.completed
        );
        self.notify(
            TaskListChange::Toggled {
                id,
                completed: task.completed,
            },
            persisted,
        );
        Some(task)
    }

    /// Removes the task with `id`. Returns whether a task was removed.
    pub fn delete(&mut self, id: TaskId) -> bool {
        let Some(index) = self.position(id) else {
            debug!("event=task_delete module=task_list status=noop task_id={id}");
            return false;
        };

        self.tasks.remove(index);
        let persisted = self.persist();
        info!(
            "event=task_delete module=task_list status=ok task_id={} total={}",
            id,
            self.tasks.len()
        );
        self.notify(TaskListChange::Deleted(id), persisted);
        true
    }

    /// Removes every completed task with a single snapshot write.
    ///
    /// Relative order of the remaining tasks is preserved. Returns the number
    /// of removed tasks; `0` means nothing was written.
    pub fn clear_completed(&mut self) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|task| !task.completed);
        let removed = before - self.tasks.len();
        if removed == 0 {
            return 0;
        }

        let persisted = self.persist();
        info!(
            "event=tasks_clear_completed module=task_list status=ok removed={} total={}",
            removed,
            self.tasks.len()
        );
        self.notify(TaskListChange::ClearedCompleted { removed }, persisted);
        removed
    }

    /// Current totals, computed on demand.
    pub fn counts(&self) -> TaskCounts {
        TaskCounts::from_tasks(&self.tasks)
    }

    /// Tasks in display order (newest first).
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Tasks matching `filter`, in display order.
    pub fn filtered(&self, filter: TaskFilter) -> impl Iterator<Item = &Task> + '_ {
        self.tasks.iter().filter(move |task| filter.matches(task))
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn has_completed(&self) -> bool {
        self.tasks.iter().any(|task| task.completed)
    }

    /// Registers a listener called after every applied change.
    pub fn subscribe(&mut self, listener: impl FnMut(&TaskListEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(registered, _)| *registered != id);
        self.listeners.len() != before
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consumes the controller and hands back its store.
    pub fn into_store(self) -> S {
        self.store
    }

    fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }

    fn notify(&mut self, change: TaskListChange, persisted: bool) {
        if self.listeners.is_empty() {
            return;
        }
        let event = TaskListEvent {
            change,
            counts: TaskCounts::from_tasks(&self.tasks),
            persisted,
        };
        for (_, listener) in &mut self.listeners {
            listener(&event);
        }
    }
}

fn decode_snapshot(snapshot: Value) -> Vec<Task> {
    let Value::Array(entries) = snapshot else {
        warn!("event=tasks_load module=task_list status=fallback error_code=snapshot_not_array");
        return Vec::new();
    };

    let mut seen = HashSet::with_capacity(entries.len());
    let mut tasks = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<Task>(entry) {
            Ok(task) if seen.insert(task.id) => tasks.push(task),
            Ok(task) => warn!(
                "event=tasks_load module=task_list status=skip index={} task_id={} error_code=duplicate_id",
                index, task.id
            ),
            Err(err) => warn!(
                "event=tasks_load module=task_list status=skip index={index} error_code=malformed_entry error={err}"
            ),
        }
    }
    tasks
}
