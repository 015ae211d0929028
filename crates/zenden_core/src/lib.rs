//! Core domain logic for Zen Den.
//! This crate is the single source of truth for garden invariants.

pub mod canvas;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod storage;

pub use canvas::CanvasBounds;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::garden::{
    AmbientSound, AtmosphereSettings, Garden, GardenItem, GardenValidationError, ItemKind,
    Position, TimeOfDay, MAX_GARDEN_ITEMS,
};
pub use model::share_id::{generate_share_id, is_valid_share_id};
pub use repo::share_repo::{RepoError, RepoResult, ShareRepository, SqliteShareRepository};
pub use service::library_service::{
    GardenLibrary, ImportOutcome, LibraryError, GARDEN_TO_LOAD_KEY, SAVED_GARDENS_KEY,
};
pub use service::share_service::{
    parse_share_request, ErrorKind, ShareError, ShareLink, ShareReceipt, ShareService,
};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};

/// Minimal health-check API.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
