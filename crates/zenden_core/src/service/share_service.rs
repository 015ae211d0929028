//! Share-link use-case service.
//!
//! # Responsibility
//! - Turn a `{ "garden": ... }` request body into a stored share and a URL.
//! - Resolve a share id back into a garden.
//! - Classify every failure as invalid input, not found, or internal.
//!
//! # Invariants
//! - A share id is generated fresh for every share call, even when the same
//!   garden is shared twice.
//! - Nothing reaches the repository before the garden decodes and validates.
//! - A stored blob that no longer decodes is an internal failure, never 404.

use crate::model::garden::{Garden, GardenValidationError};
use crate::model::share_id::{generate_share_id, is_valid_share_id};
use crate::repo::share_repo::{RepoError, ShareRepository};
use log::{error, info, warn};
use serde::Deserialize;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

const MAX_INSERT_ATTEMPTS: usize = 5;
/// Path segment placed between the base URL and the share id.
pub const DEFAULT_SHARE_PATH_PREFIX: &str = "/share";

/// Coarse failure class used by transport layers to pick a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    NotFound,
    Internal,
}

/// Service error for share use-cases.
#[derive(Debug)]
pub enum ShareError {
    /// Request body or id failed decoding or validation.
    InvalidInput(String),
    /// No garden is stored under the id.
    NotFound(String),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Stored text under `id` is not a valid garden.
    Corrupt { id: String, message: String },
    /// Garden could not be serialized for storage.
    Encode(serde_json::Error),
}

impl ShareError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Repo(_) | Self::Corrupt { .. } | Self::Encode(_) => ErrorKind::Internal,
        }
    }
}

impl Display for ShareError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(message) => write!(f, "{message}"),
            Self::NotFound(id) => write!(f, "shared garden not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Corrupt { id, message } => {
                write!(f, "stored garden `{id}` is unreadable: {message}")
            }
            Self::Encode(err) => write!(f, "failed to encode garden: {err}"),
        }
    }
}

impl Error for ShareError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Encode(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ShareError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            other => Self::Repo(other),
        }
    }
}

impl From<GardenValidationError> for ShareError {
    fn from(value: GardenValidationError) -> Self {
        Self::InvalidInput(format!("invalid garden: {value}"))
    }
}

/// Builds public share URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareLink {
    base_url: String,
    path_prefix: String,
}

impl ShareLink {
    /// Uses the default `/share` prefix.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_prefix(base_url, DEFAULT_SHARE_PATH_PREFIX)
    }

    /// Trailing slashes on `base_url` and `path_prefix` are dropped.
    pub fn with_prefix(base_url: impl Into<String>, path_prefix: &str) -> Self {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        let trimmed = path_prefix.trim().trim_matches('/');
        let path_prefix = if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{trimmed}")
        };
        Self {
            base_url,
            path_prefix,
        }
    }

    pub fn url_for(&self, id: &str) -> String {
        format!("{}{}/{}", self.base_url, self.path_prefix, id)
    }
}

/// Result of a successful share call.
#[derive(Debug, Clone, PartialEq)]
pub struct ShareReceipt {
    pub id: String,
    pub share_url: String,
    /// Garden as stored, with its id filled in.
    pub garden: Garden,
}

/// Share service facade over repository implementations.
pub struct ShareService<R: ShareRepository> {
    repo: R,
    link: ShareLink,
}

impl<R: ShareRepository> ShareService<R> {
    pub fn new(repo: R, link: ShareLink) -> Self {
        Self { repo, link }
    }

    /// Shares a garden from a raw request body of shape `{ "garden": {...} }`.
    ///
    /// # Errors
    /// - `InvalidInput` when the body is not JSON, `garden` is not an object,
    ///   `garden.items` is missing or not an array, or the garden is invalid.
    /// - Internal variants when encoding or persistence fails.
    pub fn share_json(&self, body: &str) -> Result<ShareReceipt, ShareError> {
        let garden = parse_share_request(body)?;
        self.share(garden)
    }

    /// Validates and stores a garden under a freshly generated share id.
    pub fn share(&self, mut garden: Garden) -> Result<ShareReceipt, ShareError> {
        garden.ensure_identity();
        garden.validate()?;
        let data = serde_json::to_string(&garden).map_err(ShareError::Encode)?;

        let id = self.insert_with_fresh_id(&data)?;
        info!(
            "event=share_create module=service status=ok share_id={} items={} bytes={}",
            id,
            garden.items.len(),
            data.len()
        );

        Ok(ShareReceipt {
            share_url: self.link.url_for(&id),
            id,
            garden,
        })
    }

    /// Loads the garden stored under `id`.
    ///
    /// # Errors
    /// - `InvalidInput` for malformed ids.
    /// - `NotFound` when nothing is stored under `id`.
    /// - `Corrupt` when the stored text does not decode.
    pub fn fetch(&self, id: &str) -> Result<Garden, ShareError> {
        if !is_valid_share_id(id) {
            return Err(ShareError::InvalidInput(format!("invalid share id `{id}`")));
        }

        let data = self
            .repo
            .get_share(id)?
            .ok_or_else(|| ShareError::NotFound(id.to_string()))?;

        serde_json::from_str::<Garden>(&data).map_err(|err| {
            error!(
                "event=share_fetch module=service status=error share_id={} error_code=corrupt_blob error={}",
                id, err
            );
            ShareError::Corrupt {
                id: id.to_string(),
                message: err.to_string(),
            }
        })
    }

    fn insert_with_fresh_id(&self, data: &str) -> Result<String, ShareError> {
        let mut attempt = 1;
        loop {
            let id = generate_share_id();
            match self.repo.insert_share(&id, data) {
                Ok(()) => return Ok(id),
                Err(RepoError::Conflict(_)) if attempt < MAX_INSERT_ATTEMPTS => {
                    warn!(
                        "event=share_create module=service status=retry attempt={} error_code=id_collision",
                        attempt
                    );
                    attempt += 1;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}

/// Decodes a `{ "garden": ... }` body into a garden without validating it.
pub fn parse_share_request(body: &str) -> Result<Garden, ShareError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|err| ShareError::InvalidInput(format!("request body is not valid JSON: {err}")))?;

    let garden = match value.get("garden") {
        Some(garden @ Value::Object(_)) => garden,
        _ => {
            return Err(ShareError::InvalidInput(
                "request body must contain a `garden` object".to_string(),
            ))
        }
    };

    match garden.get("items") {
        Some(Value::Array(_)) => {}
        Some(_) => {
            return Err(ShareError::InvalidInput(
                "`garden.items` must be an array".to_string(),
            ))
        }
        None => {
            return Err(ShareError::InvalidInput(
                "`garden.items` is required".to_string(),
            ))
        }
    }

    Garden::deserialize(garden)
        .map_err(|err| ShareError::InvalidInput(format!("invalid garden: {err}")))
}

#[cfg(test)]
mod tests {
    use super::{ShareError, ShareLink, ShareService};
    use crate::model::garden::Garden;
    use crate::repo::share_repo::{RepoError, RepoResult, ShareRepository};
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;

    /// Reports a conflict for the first `conflicts` inserts.
    #[derive(Default)]
    struct CollidingRepo {
        conflicts: Cell<usize>,
        rows: RefCell<HashMap<String, String>>,
    }

    impl ShareRepository for CollidingRepo {
        fn insert_share(&self, id: &str, data: &str) -> RepoResult<()> {
            if self.conflicts.get() > 0 {
                self.conflicts.set(self.conflicts.get() - 1);
                return Err(RepoError::Conflict(id.to_string()));
            }
            self.rows.borrow_mut().insert(id.to_string(), data.to_string());
            Ok(())
        }

        fn put_share(&self, id: &str, data: &str) -> RepoResult<()> {
            self.rows.borrow_mut().insert(id.to_string(), data.to_string());
            Ok(())
        }

        fn get_share(&self, id: &str) -> RepoResult<Option<String>> {
            Ok(self.rows.borrow().get(id).cloned())
        }

        fn delete_share(&self, id: &str) -> RepoResult<()> {
            self.rows
                .borrow_mut()
                .remove(id)
                .map(|_| ())
                .ok_or_else(|| RepoError::NotFound(id.to_string()))
        }

        fn count_shares(&self) -> RepoResult<u64> {
            Ok(self.rows.borrow().len() as u64)
        }
    }

    #[test]
    fn share_retries_on_id_collision() {
        let repo = CollidingRepo::default();
        repo.conflicts.set(2);
        let service = ShareService::new(repo, ShareLink::new("http://localhost"));

        let receipt = service.share(Garden::new("retry")).unwrap();
        assert_eq!(service.fetch(&receipt.id).unwrap(), receipt.garden);
    }

    #[test]
    fn share_gives_up_after_repeated_collisions() {
        let repo = CollidingRepo::default();
        repo.conflicts.set(usize::MAX);
        let service = ShareService::new(repo, ShareLink::new("http://localhost"));

        let err = service.share(Garden::new("unlucky")).unwrap_err();
        assert!(matches!(err, ShareError::Repo(RepoError::Conflict(_))));
    }

    #[test]
    fn share_link_normalizes_slashes() {
        let link = ShareLink::with_prefix("https://zen.example/", "/garden/");
        assert_eq!(link.url_for("abc"), "https://zen.example/garden/abc");

        let bare = ShareLink::with_prefix("https://zen.example", "");
        assert_eq!(bare.url_for("abc"), "https://zen.example/abc");
    }
}
