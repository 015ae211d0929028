//! Router and request handlers.
//!
//! # Responsibility
//! - Translate HTTP requests into `ShareService` calls.
//! - Keep response shapes compatible with the browser client.

use crate::error::ApiError;
use crate::state::SharedState;
use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, Path, State};
use axum::http::{header, HeaderMap, Method};
use axum::routing::{get, post};
use axum::{Json, Router};
use log::info;
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use zenden_core::{Garden, ShareLink, ShareService, SqliteShareRepository};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareResponse {
    pub id: String,
    pub share_url: String,
}

#[derive(Debug, Serialize)]
pub struct GardenResponse {
    pub garden: Garden,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub fn build_router(state: SharedState, max_body_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/api/health", get(health))
        .route("/api/share", post(create_share))
        .route("/api/share/:id", get(fetch_share))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(cors)
        .with_state(state)
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: zenden_core::core_version(),
    })
}

/// `POST /api/share` with body `{ "garden": Garden }`.
pub async fn create_share(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ShareResponse>, ApiError> {
    let body = String::from_utf8(body.to_vec())
        .map_err(|_| ApiError::bad_request("request body must be UTF-8 JSON"))?;
    let link = state.share_link(&headers);

    let receipt = state
        .with_db("share_create", move |conn| {
            ShareService::new(SqliteShareRepository::new(conn), link).share_json(&body)
        })
        .await?;

    info!(
        "event=http_share_create module=http status=ok share_id={}",
        receipt.id
    );
    Ok(Json(ShareResponse {
        id: receipt.id,
        share_url: receipt.share_url,
    }))
}

/// `GET /api/share/{id}`.
pub async fn fetch_share(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<GardenResponse>, ApiError> {
    // Lookups never build links.
    let garden = state
        .with_db("share_fetch", move |conn| {
            ShareService::new(SqliteShareRepository::new(conn), ShareLink::new("")).fetch(&id)
        })
        .await?;

    Ok(Json(GardenResponse { garden }))
}
