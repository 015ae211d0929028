//! Shared-garden repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Store one serialized garden per share key.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - `insert_share` never overwrites an existing key.
//! - `put_share` is last-write-wins and refreshes `updated_at`.

use crate::db::DbError;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for share persistence operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(String),
    Conflict(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "shared garden not found: {id}"),
            Self::Conflict(id) => write!(f, "share id already in use: {id}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::Conflict(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for the share key-value table.
pub trait ShareRepository {
    /// Stores `data` under a new key. Fails with `Conflict` if the key exists.
    fn insert_share(&self, id: &str, data: &str) -> RepoResult<()>;
    /// Stores `data` under `id`, replacing any previous value.
    fn put_share(&self, id: &str, data: &str) -> RepoResult<()>;
    fn get_share(&self, id: &str) -> RepoResult<Option<String>>;
    fn delete_share(&self, id: &str) -> RepoResult<()>;
    fn count_shares(&self) -> RepoResult<u64>;
}

/// SQLite-backed share repository.
pub struct SqliteShareRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteShareRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ShareRepository for SqliteShareRepository<'_> {
    fn insert_share(&self, id: &str, data: &str) -> RepoResult<()> {
        let result = self.conn.execute(
            "INSERT INTO shared_gardens (id, data) VALUES (?1, ?2);",
            params![id, data],
        );

        match result {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == ErrorCode::ConstraintViolation =>
            {
                Err(RepoError::Conflict(id.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn put_share(&self, id: &str, data: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO shared_gardens (id, data) VALUES (?1, ?2)
             ON CONFLICT(id) DO UPDATE SET
                data = excluded.data,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![id, data],
        )?;
        Ok(())
    }

    fn get_share(&self, id: &str) -> RepoResult<Option<String>> {
        let data = self
            .conn
            .query_row(
                "SELECT data FROM shared_gardens WHERE id = ?1;",
                [id],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(data)
    }

    fn delete_share(&self, id: &str) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM shared_gardens WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id.to_string()));
        }
        Ok(())
    }

    fn count_shares(&self) -> RepoResult<u64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM shared_gardens;", [], |row| {
                row.get::<_, i64>(0)
            })?;
        Ok(u64::try_from(count).unwrap_or(0))
    }
}
