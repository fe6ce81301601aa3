//! Blogline database access: the one connection a menu session runs on.
//!
//! The connection file names a [`crate::config::DbTarget`]; [`open_target`]
//! turns it into a connection whose `blogs`/`posts` schema is current and
//! whose foreign keys are enforced. The repository layer refuses any
//! connection that did not come through here.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory, open_target};

pub type DbResult<T> = Result<T, DbError>;

/// Failure while opening or migrating the blog database.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The database file was written by a newer blogline build.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
