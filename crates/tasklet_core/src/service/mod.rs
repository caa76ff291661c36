//! Core use-case services.
//!
//! # Responsibility
//! - Own in-memory widget state and mirror it into a settings store.
//! - Keep presentation adapters decoupled from storage details.

pub mod preferences;
pub mod task_list;
