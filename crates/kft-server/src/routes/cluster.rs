use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use kft_core::paths::validate_name;
use kft_core::selection::{auto_container, auto_context, auto_namespace};

use super::{non_empty, query};
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Default, serde::Deserialize)]
pub struct ScopeQuery {
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub namespace: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
pub struct PodQuery {
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub namespace: Option<String>,
    pub pod: String,
}

/// GET /api/contexts — kubeconfig contexts plus the current one.
///
/// `selected` is the context a UI should preselect: set only when the
/// kubeconfig has exactly one context.
pub async fn get_contexts(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let kubectl = app.kubectl.clone();
    let result = tokio::task::spawn_blocking(move || {
        let contexts = kubectl.get_contexts()?;
        let current = kubectl.current_context()?;
        let selected = auto_context(&contexts);
        Ok::<_, kft_core::KftError>(serde_json::json!({
            "contexts": contexts,
            "current": current,
            "selected": selected,
        }))
    })
    .await
    .map_err(AppError::join)??;

    Ok(Json(result))
}

/// GET /api/namespaces?context= — namespaces, with `default` preselected
/// when present.
pub async fn get_namespaces(
    State(app): State<AppState>,
    q: Result<Query<ScopeQuery>, QueryRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let q = query(q)?;
    let kubectl = app.kubectl.clone();
    let context = non_empty(q.context);
    let result = tokio::task::spawn_blocking(move || {
        let namespaces = kubectl.get_namespaces(context.as_deref())?;
        let selected = auto_namespace(&namespaces);
        Ok::<_, kft_core::KftError>(serde_json::json!({
            "context": context,
            "namespaces": namespaces,
            "selected": selected,
        }))
    })
    .await
    .map_err(AppError::join)??;

    Ok(Json(result))
}

/// GET /api/pods?context=&namespace= — pod names.
pub async fn get_pods(
    State(app): State<AppState>,
    q: Result<Query<ScopeQuery>, QueryRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let q = query(q)?;
    let kubectl = app.kubectl.clone();
    let context = non_empty(q.context);
    let namespace = non_empty(q.namespace);
    if let Some(ns) = &namespace {
        validate_name("namespace", ns)?;
    }
    let result = tokio::task::spawn_blocking(move || {
        let pods = kubectl.get_pods(context.as_deref(), namespace.as_deref())?;
        Ok::<_, kft_core::KftError>(serde_json::json!({
            "context": context,
            "namespace": namespace,
            "pods": pods,
        }))
    })
    .await
    .map_err(AppError::join)??;

    Ok(Json(result))
}

/// GET /api/containers?context=&namespace=&pod= — containers of one pod;
/// a sole container is preselected.
pub async fn get_containers(
    State(app): State<AppState>,
    q: Result<Query<PodQuery>, QueryRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let q = query(q)?;
    let kubectl = app.kubectl.clone();
    let context = non_empty(q.context);
    let namespace = non_empty(q.namespace);
    let pod = q.pod.trim().to_string();
    validate_name("pod", &pod)?;
    if let Some(ns) = &namespace {
        validate_name("namespace", ns)?;
    }
    let result = tokio::task::spawn_blocking(move || {
        let containers =
            kubectl.get_pod_containers(context.as_deref(), namespace.as_deref(), &pod)?;
        let selected = auto_container(&containers);
        Ok::<_, kft_core::KftError>(serde_json::json!({
            "pod": pod,
            "containers": containers,
            "selected": selected,
        }))
    })
    .await
    .map_err(AppError::join)??;

    Ok(Json(result))
}
