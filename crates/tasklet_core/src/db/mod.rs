//! Settings database access.
//!
//! The widget keeps everything it remembers (task snapshot, theme, pin state,
//! window bounds) as JSON values in one namespaced `settings` table. This
//! module owns getting a connection to that table into a usable state.
//!
//! # Responsibility
//! - Open the settings file (or an in-memory copy) and run pending migrations.
//! - Classify failures so callers can log a stable `error_code`.
//!
//! # Invariants
//! - `PRAGMA user_version` equals the number of applied migrations.
//! - A connection is never handed out before the `settings` table exists.
//! - A file written by a newer build is refused, never downgraded.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Why the settings database could not be made ready.
#[derive(Debug)]
pub enum DbError {
    /// SQLite refused to open the file or to run a statement.
    Sqlite(rusqlite::Error),
    /// The directory that should hold the settings file could not be created.
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The file records more migrations than this build knows about.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl DbError {
    /// Stable identifier used in `error_code=` log fields.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Sqlite(_) => "settings_db_sqlite",
            Self::CreateDir { .. } => "settings_dir_unavailable",
            Self::UnsupportedSchemaVersion { .. } => "settings_schema_too_new",
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "settings database error: {err}"),
            Self::CreateDir { path, source } => write!(
                f,
                "cannot create settings directory `{}`: {source}",
                path.display()
            ),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "settings file is at schema {db_version}, this build only knows up to {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::CreateDir { source, .. } => Some(source),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
