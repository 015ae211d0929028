//! String key-value stores backing the local garden library.
//!
//! # Responsibility
//! - Stand in for browser local storage: flat string keys, string values.
//! - Offer an in-memory store for tests and a single-file store for tools.
//!
//! # Invariants
//! - A successful `set` or `remove` is durable before it returns (file store).

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug)]
pub enum StorageError {
    Io(std::io::Error),
    Corrupt(String),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Corrupt(message) => write!(f, "corrupt store file: {message}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Corrupt(_) => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Flat string key-value storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> StorageResult<()>;
    /// Removes `key`, returning whether it existed.
    fn remove(&mut self, key: &str) -> StorageResult<bool>;
}
