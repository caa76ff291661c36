//! Core domain logic for the Tasklet desktop widget.
//! This crate is the single source of truth for task list invariants and
//! for how widget state is mirrored into the settings store.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod projection;
pub mod service;
pub mod store;

pub use config::{ConfigError, ConfigOverrides, WidgetConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::preferences::{Preferences, Theme, WindowBounds};
pub use model::task::{Task, TaskId, TaskValidationError};
pub use projection::{format_relative, TaskCounts, TaskFilter};
pub use service::preferences::PreferencesService;
pub use service::task_list::{
    SubscriptionId, TaskListChange, TaskListController, TaskListEvent, TASKS_KEY,
};
pub use store::{
    MemorySettingsStore, SettingsStore, SettingsStoreExt, SqliteSettingsStore, StoreError,
    StoreResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
