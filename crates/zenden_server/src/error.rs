//! HTTP error envelope.
//!
//! # Invariants
//! - Every failure maps to exactly one of 400, 404, 413 or 500.
//! - 500 bodies carry a fixed message; the cause goes to the log only.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::{debug, error};
use serde_json::json;
use zenden_core::{ErrorKind, ShareError};

const INTERNAL_MESSAGE: &str = "internal server error";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    /// Logs `cause` and returns a 500 with the fixed public message.
    pub fn internal(operation: &str, cause: &dyn std::fmt::Display) -> Self {
        error!(
            "event={} module=http status=error error_code=internal error={}",
            operation, cause
        );
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: INTERNAL_MESSAGE.to_string(),
        }
    }

    pub(crate) fn from_share_error(operation: &str, err: ShareError) -> Self {
        match err.kind() {
            ErrorKind::InvalidInput => {
                debug!(
                    "event={} module=http status=rejected http_status=400 error={}",
                    operation, err
                );
                Self::bad_request(err.to_string())
            }
            ErrorKind::NotFound => Self::not_found("shared garden not found"),
            ErrorKind::Internal => Self::internal(operation, &err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
