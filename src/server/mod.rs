//! HTTP surface: upload a CSV, read back the latest snapshot, follow anomaly alerts.

mod error;
mod handlers;

pub use error::{AppError, AppResult};
pub use handlers::sanitize_filename;

use crate::config::ServerConfig;
use crate::storage::{alert_channel, Alert, SnapshotStore};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::broadcast;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SnapshotStore>,
    pub alerts: broadcast::Sender<Alert>,
}

impl AppState {
    pub fn new() -> Self {
        let alerts = alert_channel();
        Self {
            store: Arc::new(SnapshotStore::with_alerts(alerts.clone())),
            alerts,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

pub fn create_router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/upload", post(handlers::upload))
        .route("/get-predictions", get(handlers::get_predictions))
        .route("/health", get(handlers::health))
        .route("/alerts", get(handlers::alerts))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Bind and serve until `shutdown` resolves.
pub async fn serve<F>(config: &ServerConfig, state: AppState, shutdown: F) -> crate::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = create_router(state, config.max_upload_bytes);
    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    tracing::info!("server stopped");
    Ok(())
}
