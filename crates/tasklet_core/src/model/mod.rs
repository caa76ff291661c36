//! Domain model for the widget.
//!
//! # Responsibility
//! - Define the task record mirrored into the settings store.
//! - Define the typed preference values the widget persists.
//!
//! # Invariants
//! - Every task is identified by a stable, never-reused `TaskId`.
//! - A task carries a completion timestamp exactly when it is completed.

pub mod preferences;
pub mod task;
