pub mod cluster;
pub mod config;
pub mod files;
pub mod history;
pub mod transfers;

use axum::extract::rejection::QueryRejection;
use axum::extract::Query;
use axum::Json;

use crate::error::AppError;

/// GET /api/health — liveness probe for the UI layer.
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Treat `?context=` the same as an absent parameter.
pub(crate) fn non_empty(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Unwrap query parameters, turning an extraction failure into a JSON 400.
pub(crate) fn query<T>(q: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
    q.map(|Query(v)| v)
        .map_err(|e| AppError::bad_request(e.body_text()))
}
