use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use kft_core::kubectl::PodListing;
use kft_core::target::PodTarget;

use super::{non_empty, query};
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, serde::Deserialize)]
pub struct PodFilesQuery {
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub namespace: Option<String>,
    pub pod: String,
    #[serde(default)]
    pub container: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
}

/// GET /api/pod-files — `ls -la` of a path inside the pod, raw and parsed.
/// `path` defaults to the configured pod path.
pub async fn list_pod_files(
    State(app): State<AppState>,
    q: Result<Query<PodFilesQuery>, QueryRejection>,
) -> Result<Json<PodListing>, AppError> {
    let q = query(q)?;
    let target = PodTarget {
        context: non_empty(q.context),
        namespace: non_empty(q.namespace),
        pod: q.pod,
        container: non_empty(q.container),
    }
    .normalized();
    target.validate()?;
    let path = non_empty(q.path).unwrap_or_else(|| app.config.defaults.pod_path.clone());

    let kubectl = app.kubectl.clone();
    let listing = tokio::task::spawn_blocking(move || kubectl.list_pod_files(&target, &path))
        .await
        .map_err(AppError::join)??;

    Ok(Json(listing))
}
