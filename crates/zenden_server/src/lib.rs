//! HTTP surface for Zen Den share links.
//!
//! # Responsibility
//! - Expose `POST /api/share` and `GET /api/share/{id}` over the core share
//!   service.
//! - Own process wiring: configuration, database, listener, shutdown.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::{ConfigError, ServerConfig};
pub use error::ApiError;
pub use routes::build_router;
pub use state::{AppState, SharedState};

use anyhow::Context;
use log::info;
use zenden_core::db::open_db;

/// Opens the database, binds the listener and serves until Ctrl-C.
pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    if let Some(parent) = config.database_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create database directory `{}`", parent.display())
            })?;
        }
    }
    let conn = open_db(&config.database_path).with_context(|| {
        format!("failed to open database `{}`", config.database_path.display())
    })?;

    let state = AppState::new(
        conn,
        config.public_base_url.clone(),
        config.share_path_prefix.clone(),
    );
    let app = build_router(state, config.max_body_bytes);

    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("failed to bind `{}`", config.bind))?;
    info!(
        "event=server_start module=http status=ok bind={} db={}",
        config.bind,
        config.database_path.display()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server terminated unexpectedly")?;

    info!("event=server_stop module=http status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::warn!(
            "event=server_signal module=http status=error error={}",
            err
        );
        std::future::pending::<()>().await;
    }
}
