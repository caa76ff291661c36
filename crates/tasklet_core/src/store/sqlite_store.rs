//! SQLite-backed settings store.
//!
//! # Responsibility
//! - Persist JSON values in the `settings` table, partitioned by namespace.
//! - Keep SQL details inside the store boundary.
//!
//! # Invariants
//! - Values are stored as JSON text and decoded on read.
//! - Writes are upserts; the last write for a key wins.

use super::{SettingsStore, StoreError, StoreResult};
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;

/// Settings store over a borrowed, migrated SQLite connection.
#[derive(Debug, Clone)]
pub struct SqliteSettingsStore<'conn> {
    conn: &'conn Connection,
    namespace: String,
}

impl<'conn> SqliteSettingsStore<'conn> {
    /// Creates a store for `namespace` after checking the schema is present.
    ///
    /// # Errors
    /// - `InvalidNamespace` when `namespace` is blank.
    /// - `MissingSchema` when the connection was not opened through `open_db*`.
    pub fn try_new(conn: &'conn Connection, namespace: &str) -> StoreResult<Self> {
        let namespace = namespace.trim();
        if namespace.is_empty() {
            return Err(StoreError::InvalidNamespace(namespace.to_string()));
        }

        let has_table: bool = conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'settings'
            );",
            [],
            |row| row.get(0),
        )?;
        if !has_table {
            return Err(StoreError::MissingSchema);
        }

        Ok(Self {
            conn,
            namespace: namespace.to_string(),
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Lists stored keys in this namespace, sorted ascending.
    pub fn keys(&self) -> StoreResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM settings WHERE namespace = ?1 ORDER BY key ASC;")?;
        let keys = stmt
            .query_map([self.namespace.as_str()], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(keys)
    }
}

impl SettingsStore for SqliteSettingsStore<'_> {
    fn read(&self, key: &str) -> StoreResult<Option<Value>> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM settings WHERE namespace = ?1 AND key = ?2;",
                params![self.namespace.as_str(), key],
                |row| row.get(0),
            )
            .optional()?;

        match raw {
            Some(text) => serde_json::from_str(&text)
                .map(Some)
                .map_err(|err| StoreError::InvalidData {
                    key: key.to_string(),
                    message: err.to_string(),
                }),
            None => Ok(None),
        }
    }

    fn write(&self, key: &str, value: &Value) -> StoreResult<()> {
        let text = serde_json::to_string(value)?;
        self.conn.execute(
            "INSERT INTO settings (namespace, key, value)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(namespace, key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![self.namespace.as_str(), key, text],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<bool> {
        let changed = self.conn.execute(
            "DELETE FROM settings WHERE namespace = ?1 AND key = ?2;",
            params![self.namespace.as_str(), key],
        )?;
        Ok(changed > 0)
    }
}
