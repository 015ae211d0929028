//! Garden domain model and share identifiers.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Generate and check short share keys.

pub mod garden;
pub mod share_id;
