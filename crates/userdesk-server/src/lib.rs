//! HTTP API for Userdesk.
//!
//! Serves the user endpoints, the weather proxy, and the built UI from a
//! static directory with `index.html` as the catch-all.

pub mod error;
pub mod handlers;
pub mod shutdown;
pub mod state;

use std::path::Path;
use std::time::Duration;

use axum::routing::get;
use axum::{middleware, Router};
use tokio::net::TcpListener;
use tower_http::services::{ServeDir, ServeFile};
use userdesk_core::{AppError, Config, ConfigError};

pub use error::ApiError;
pub use shutdown::{run_until, shutdown_signal};
pub use state::AppState;

/// Build the full router.
pub fn router(state: AppState, static_dir: &Path) -> Router {
    let spa = ServeDir::new(static_dir).fallback(ServeFile::new(static_dir.join("index.html")));

    Router::new()
        .route(
            "/api/users",
            get(handlers::users::list)
                .post(handlers::users::create)
                .delete(handlers::users::delete_all),
        )
        .route("/api/users/by-country/:code", get(handlers::users::by_country))
        .route(
            "/api/users/duplicate-names",
            get(handlers::users::duplicate_names),
        )
        .route("/api/weather/:state_code", get(handlers::weather::forecast))
        .route("/api/health", get(handlers::health))
        .fallback_service(spa)
        .layer(middleware::from_fn(handlers::log_requests))
        .with_state(state)
}

/// Bind, serve until SIGINT/SIGTERM, then drain.
pub async fn serve(config: Config) -> Result<(), AppError> {
    let addr = config
        .server
        .socket_addr()
        .map_err(|e| ConfigError::Invalid(e.to_string()))?;

    let state = AppState::from_config(&config)?;
    let app = router(state, &config.server.static_dir);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    run_until(
        listener,
        app,
        shutdown_signal(),
        Duration::from_secs(config.server.shutdown_grace_secs),
    )
    .await
}
