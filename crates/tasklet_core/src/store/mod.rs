//! Namespaced key-value settings store.
//!
//! # Responsibility
//! - Define the raw JSON store contract shared by every backend.
//! - Provide typed best-effort `get`/`set` helpers used by controllers.
//!
//! # Invariants
//! - Raw operations report failures; typed helpers log and swallow them.
//! - A value that cannot be decoded as the requested type reads as the default.
//! - No multi-key atomicity is offered or assumed.

pub mod memory_store;
pub mod sqlite_store;

use crate::db::DbError;
use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub use memory_store::MemorySettingsStore;
pub use sqlite_store::SqliteSettingsStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Settings store failure.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    Serialization(serde_json::Error),
    InvalidNamespace(String),
    /// The backing database has not been migrated.
    MissingSchema,
    /// A stored value is not valid JSON.
    InvalidData { key: String, message: String },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialization(err) => write!(f, "settings serialization failed: {err}"),
            Self::InvalidNamespace(value) => write!(f, "invalid settings namespace `{value}`"),
            Self::MissingSchema => write!(f, "settings table is missing; run migrations first"),
            Self::InvalidData { key, message } => {
                write!(f, "invalid stored value for `{key}`: {message}")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialization(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

/// Raw key-value contract implemented by storage backends.
pub trait SettingsStore {
    /// Returns the stored JSON value, or `None` when the key is absent.
    fn read(&self, key: &str) -> StoreResult<Option<Value>>;
    /// Records `value` under `key`, replacing any previous value.
    fn write(&self, key: &str, value: &Value) -> StoreResult<()>;
    /// Removes `key`; returns whether a value was present.
    fn remove(&self, key: &str) -> StoreResult<bool>;
}

impl<S: SettingsStore + ?Sized> SettingsStore for &S {
    fn read(&self, key: &str) -> StoreResult<Option<Value>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &Value) -> StoreResult<()> {
        (**self).write(key, value)
    }

    fn remove(&self, key: &str) -> StoreResult<bool> {
        (**self).remove(key)
    }
}

/// Typed best-effort access on top of any [`SettingsStore`].
pub trait SettingsStoreExt: SettingsStore {
    /// Returns the stored value, or `default` when absent, unreadable or
    /// of the wrong shape.
    fn get<V: DeserializeOwned>(&self, key: &str, default: V) -> V {
        let value = match self.read(key) {
            Ok(Some(value)) => value,
            Ok(None) => return default,
            Err(err) => {
                warn!("event=settings_get module=store status=error key={key} error={err}");
                return default;
            }
        };
        match serde_json::from_value(value) {
            Ok(decoded) => decoded,
            Err(err) => {
                warn!(
                    "event=settings_get module=store status=fallback key={key} error_code=decode_failed error={err}"
                );
                default
            }
        }
    }

    /// Records `value` under `key`.
    ///
    /// Failures are logged and swallowed; returns whether the write landed.
    fn set<V: Serialize + ?Sized>(&self, key: &str, value: &V) -> bool {
        let result = serde_json::to_value(value)
            .map_err(StoreError::from)
            .and_then(|json| self.write(key, &json));
        match result {
            Ok(()) => true,
            Err(err) => {
                warn!("event=settings_set module=store status=error key={key} error={err}");
                false
            }
        }
    }
}

impl<S: SettingsStore + ?Sized> SettingsStoreExt for S {}
