//! Upload, query, health and alert stream handlers.

use super::error::{AppError, AppResult};
use super::AppState;
use crate::analysis::Snapshot;
use crate::records::ingest;
use crate::storage::UploadInfo;
use axum::{
    extract::{Multipart, State},
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use serde::Serialize;
use tokio_stream::{wrappers::BroadcastStream, Stream, StreamExt};

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    timestamp: i64,
    last_upload: Option<UploadInfo>,
}

/// Strip directories and anything outside `[A-Za-z0-9._-]` from a client file name.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or("");
    let cleaned: String = base
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();
    cleaned.trim_start_matches(['.', '_']).to_string()
}

/// POST /upload: multipart `file` field, replaces the snapshot on success.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<MessageResponse>> {
    let mut file = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let name = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        file = Some((name, bytes));
        break;
    }

    let (name, bytes) = file.ok_or(AppError::NoFilePart)?;
    if name.is_empty() {
        return Err(AppError::NoSelectedFile);
    }
    let file_name = sanitize_filename(&name);
    tracing::info!(file = %file_name, bytes = bytes.len(), "upload received");

    let store = state.store.clone();
    tokio::task::spawn_blocking(move || -> crate::Result<()> {
        let records = ingest(&bytes)?;
        let info = UploadInfo::new(file_name, &bytes, records.len());
        store.process_upload(records, Some(info));
        Ok(())
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(Json(MessageResponse {
        message: "File uploaded successfully",
    }))
}

/// GET /get-predictions: the current snapshot.
pub async fn get_predictions(State(state): State<AppState>) -> Json<Snapshot> {
    Json(state.store.current().as_ref().clone())
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().timestamp(),
        last_upload: state.store.last_upload(),
    })
}

/// GET /alerts: server-sent `alert` events, one per upload with abnormal records.
pub async fn alerts(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let stream = BroadcastStream::new(state.alerts.subscribe()).filter_map(|msg| match msg {
        Ok(alert) => Some(Event::default().event("alert").json_data(&alert)),
        Err(err) => {
            tracing::warn!(error = %err, "alert subscriber lagged");
            None
        }
    });
    Sse::new(stream).keep_alive(KeepAlive::default())
}
