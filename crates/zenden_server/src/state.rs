//! Shared request state.

use crate::error::ApiError;
use axum::http::header::HOST;
use axum::http::HeaderMap;
use parking_lot::Mutex;
use rusqlite::Connection;
use std::sync::Arc;
use zenden_core::{ShareError, ShareLink};

pub type SharedState = Arc<AppState>;

/// One SQLite connection serialized behind a mutex, plus link settings.
pub struct AppState {
    db: Mutex<Connection>,
    public_base_url: Option<String>,
    share_path_prefix: String,
}

impl AppState {
    pub fn new(
        conn: Connection,
        public_base_url: Option<String>,
        share_path_prefix: impl Into<String>,
    ) -> SharedState {
        Arc::new(Self {
            db: Mutex::new(conn),
            public_base_url,
            share_path_prefix: share_path_prefix.into(),
        })
    }

    /// Link builder for a request: configured base URL, else the Host header.
    pub fn share_link(&self, headers: &HeaderMap) -> ShareLink {
        let base = self
            .public_base_url
            .clone()
            .unwrap_or_else(|| base_url_from_headers(headers));
        ShareLink::with_prefix(base, &self.share_path_prefix)
    }

    /// Runs a share operation against the database on the blocking pool.
    pub async fn with_db<T, F>(
        self: &Arc<Self>,
        operation: &'static str,
        f: F,
    ) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, ShareError> + Send + 'static,
    {
        let state = Arc::clone(self);
        let joined = tokio::task::spawn_blocking(move || {
            let conn = state.db.lock();
            f(&conn)
        })
        .await;

        match joined {
            Ok(result) => result.map_err(|err| ApiError::from_share_error(operation, err)),
            Err(err) => Err(ApiError::internal(operation, &err)),
        }
    }
}

fn base_url_from_headers(headers: &HeaderMap) -> String {
    let host = headers
        .get(HOST)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.trim().is_empty())
        .unwrap_or("localhost");
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|value| value.to_str().ok())
        .filter(|value| matches!(*value, "http" | "https"))
        .unwrap_or("http");
    format!("{scheme}://{host}")
}

#[cfg(test)]
mod tests {
    use super::base_url_from_headers;
    use axum::http::{HeaderMap, HeaderValue};

    #[test]
    fn base_url_prefers_forwarded_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert("host", HeaderValue::from_static("zen.example:8443"));
        assert_eq!(base_url_from_headers(&headers), "http://zen.example:8443");

        headers.insert("x-forwarded-proto", HeaderValue::from_static("https"));
        assert_eq!(base_url_from_headers(&headers), "https://zen.example:8443");

        headers.insert("x-forwarded-proto", HeaderValue::from_static("gopher"));
        assert_eq!(base_url_from_headers(&headers), "http://zen.example:8443");
    }

    #[test]
    fn base_url_falls_back_to_localhost() {
        assert_eq!(base_url_from_headers(&HeaderMap::new()), "http://localhost");
    }
}
