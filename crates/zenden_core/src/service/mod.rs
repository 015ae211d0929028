//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository and store calls into use-case level APIs.
//! - Keep HTTP/CLI layers decoupled from storage details.

pub mod library_service;
pub mod share_service;
