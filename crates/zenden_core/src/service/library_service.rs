//! Local garden library over a key-value store.
//!
//! # Responsibility
//! - Keep the saved-gardens list under one fixed key, newest save first.
//! - Hand a garden from one screen to another through the load key.
//! - Merge gardens opened from share links into the local list.
//!
//! # Invariants
//! - Saves are last-write-wins by garden id.
//! - Importing never overwrites a different local garden with the same id.
//! - The staged garden is consumed by `take_staged`.

use crate::model::garden::{Garden, GardenValidationError};
use crate::storage::{KeyValueStore, StorageError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Storage key holding the JSON array of saved gardens.
pub const SAVED_GARDENS_KEY: &str = "zen-den-saved-gardens";
/// Storage key holding one garden queued for the editor to open.
pub const GARDEN_TO_LOAD_KEY: &str = "zen-den-garden-to-load";

#[derive(Debug)]
pub enum LibraryError {
    Storage(StorageError),
    /// Value under `key` is not the expected JSON shape.
    Corrupt { key: &'static str, message: String },
    Validation(GardenValidationError),
    NotFound(String),
}

impl Display for LibraryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "{err}"),
            Self::Corrupt { key, message } => write!(f, "corrupt value under `{key}`: {message}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "saved garden not found: {id}"),
        }
    }
}

impl Error for LibraryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StorageError> for LibraryError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

impl From<GardenValidationError> for LibraryError {
    fn from(value: GardenValidationError) -> Self {
        Self::Validation(value)
    }
}

pub type LibraryResult<T> = Result<T, LibraryError>;

/// How an imported garden landed in the library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// Stored under its own id.
    Added(String),
    /// An identical garden was already saved.
    Unchanged(String),
    /// Id clashed with a different local garden; stored as a copy.
    Copied { original_id: String, id: String },
}

impl ImportOutcome {
    pub fn id(&self) -> &str {
        match self {
            Self::Added(id) | Self::Unchanged(id) => id,
            Self::Copied { id, .. } => id,
        }
    }
}

pub struct GardenLibrary<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> GardenLibrary<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Saved gardens, most recently saved first.
    pub fn list(&self) -> LibraryResult<Vec<Garden>> {
        let Some(text) = self.store.get(SAVED_GARDENS_KEY)? else {
            return Ok(Vec::new());
        };
        serde_json::from_str(&text).map_err(|err| LibraryError::Corrupt {
            key: SAVED_GARDENS_KEY,
            message: err.to_string(),
        })
    }

    pub fn get(&self, id: &str) -> LibraryResult<Option<Garden>> {
        Ok(self.list()?.into_iter().find(|garden| garden.id == id))
    }

    /// Saves a garden, replacing any previous save with the same id.
    ///
    /// Returns the stored garden, with id and creation time filled.
    pub fn save(&mut self, mut garden: Garden) -> LibraryResult<Garden> {
        garden.ensure_identity();
        garden.validate()?;

        let mut gardens = self.list()?;
        gardens.retain(|saved| saved.id != garden.id);
        gardens.insert(0, garden.clone());
        self.write_list(&gardens)?;

        info!(
            "event=library_save module=library status=ok garden_id={} items={} saved_total={}",
            garden.id,
            garden.items.len(),
            gardens.len()
        );
        Ok(garden)
    }

    /// Removes a saved garden. Returns whether it existed.
    pub fn delete(&mut self, id: &str) -> LibraryResult<bool> {
        let mut gardens = self.list()?;
        let before = gardens.len();
        gardens.retain(|saved| saved.id != id);
        if gardens.len() == before {
            return Ok(false);
        }
        self.write_list(&gardens)?;
        Ok(true)
    }

    /// Renames a saved garden in place without changing its position.
    pub fn rename(&mut self, id: &str, name: impl Into<String>) -> LibraryResult<()> {
        let mut gardens = self.list()?;
        let garden = gardens
            .iter_mut()
            .find(|saved| saved.id == id)
            .ok_or_else(|| LibraryError::NotFound(id.to_string()))?;
        garden.name = name.into();
        self.write_list(&gardens)
    }

    /// Queues a garden for the editor to open next.
    pub fn stage_for_load(&mut self, garden: &Garden) -> LibraryResult<()> {
        let text = serde_json::to_string(garden).map_err(|err| LibraryError::Corrupt {
            key: GARDEN_TO_LOAD_KEY,
            message: err.to_string(),
        })?;
        self.store.set(GARDEN_TO_LOAD_KEY, &text)?;
        Ok(())
    }

    /// Returns and clears the queued garden.
    ///
    /// A corrupt staged value is cleared and reported as `None`.
    pub fn take_staged(&mut self) -> LibraryResult<Option<Garden>> {
        let Some(text) = self.store.get(GARDEN_TO_LOAD_KEY)? else {
            return Ok(None);
        };
        self.store.remove(GARDEN_TO_LOAD_KEY)?;

        match serde_json::from_str(&text) {
            Ok(garden) => Ok(Some(garden)),
            Err(err) => {
                warn!(
                    "event=library_take_staged module=library status=error error_code=corrupt_staged error={}",
                    err
                );
                Ok(None)
            }
        }
    }

    /// Merges a garden opened from a share link into the library.
    pub fn import_shared(&mut self, mut garden: Garden) -> LibraryResult<ImportOutcome> {
        garden.ensure_identity();
        match self.get(&garden.id)? {
            None => {
                let saved = self.save(garden)?;
                Ok(ImportOutcome::Added(saved.id))
            }
            Some(local) if local == garden => Ok(ImportOutcome::Unchanged(local.id)),
            Some(_) => {
                let original_id = std::mem::replace(&mut garden.id, Uuid::new_v4().to_string());
                let saved = self.save(garden)?;
                info!(
                    "event=library_import module=library status=ok mode=copy original_id={} garden_id={}",
                    original_id, saved.id
                );
                Ok(ImportOutcome::Copied {
                    original_id,
                    id: saved.id,
                })
            }
        }
    }

    fn write_list(&mut self, gardens: &[Garden]) -> LibraryResult<()> {
        let text = serde_json::to_string(gardens).map_err(|err| LibraryError::Corrupt {
            key: SAVED_GARDENS_KEY,
            message: err.to_string(),
        })?;
        self.store.set(SAVED_GARDENS_KEY, &text)?;
        Ok(())
    }
}
