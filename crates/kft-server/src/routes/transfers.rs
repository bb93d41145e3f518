use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use kft_core::history::{self, HistoryEntry};
use kft_core::transfer::{self, TransferOutcome, TransferRequest};

use crate::error::AppError;
use crate::state::AppState;

/// POST /api/transfers — run one `kubectl cp`.
///
/// 400 for a malformed body or an incomplete or invalid request, 409 while
/// another transfer is running. Once kubectl has run the response is 200 and
/// `success` carries the result, mirroring the `{success, output, error,
/// code}` shape.
pub async fn create_transfer(
    State(app): State<AppState>,
    body: Result<Json<TransferRequest>, JsonRejection>,
) -> Result<Json<TransferOutcome>, AppError> {
    let Json(body) = body.map_err(|e| AppError::bad_request(e.body_text()))?;
    let request = body.normalized();
    request.validate()?;

    let Some(slot) = app.try_begin_transfer() else {
        return Err(AppError::conflict("a transfer is already in progress"));
    };

    let kubectl = app.kubectl.clone();
    let home = app.home.clone();
    let history_cfg = app.config.history.clone();
    let history_lock = app.history_lock.clone();

    let outcome = tokio::task::spawn_blocking(move || {
        // Held until kubectl exits, even if the client goes away.
        let _slot = slot;
        let outcome = transfer::execute(&kubectl, &request)?;
        if history_cfg.enabled {
            let entry = HistoryEntry::from_outcome(&request, &outcome);
            let _history = history_lock.lock().unwrap_or_else(|e| e.into_inner());
            if let Err(e) = history::record(&home, entry, history_cfg.max_entries) {
                tracing::warn!(error = %e, "failed to record transfer history");
            }
        }
        Ok::<_, kft_core::KftError>(outcome)
    })
    .await
    .map_err(AppError::join)??;

    Ok(Json(outcome))
}
