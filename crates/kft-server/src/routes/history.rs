use axum::extract::State;
use axum::Json;
use kft_core::history::{self, HistoryEntry};

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/history — recent transfers, newest first.
pub async fn list_history(
    State(app): State<AppState>,
) -> Result<Json<Vec<HistoryEntry>>, AppError> {
    let home = app.home.clone();
    let lock = app.history_lock.clone();
    let entries = tokio::task::spawn_blocking(move || {
        let _history = lock.lock().unwrap_or_else(|e| e.into_inner());
        history::History::load(&home).map(|h| h.entries)
    })
    .await
    .map_err(AppError::join)??;

    Ok(Json(entries))
}

/// DELETE /api/history — drop all entries.
pub async fn clear_history(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let home = app.home.clone();
    let lock = app.history_lock.clone();
    let removed = tokio::task::spawn_blocking(move || {
        let _history = lock.lock().unwrap_or_else(|e| e.into_inner());
        history::clear(&home)
    })
    .await
    .map_err(AppError::join)??;

    Ok(Json(serde_json::json!({ "removed": removed })))
}
