#![cfg(unix)]

use axum::http::StatusCode;
use http_body_util::BodyExt;
use kft_core::config::Config;
use kft_core::kubectl::Kubectl;
use kft_server::state::AppState;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use tempfile::TempDir;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// A kubectl stand-in that answers like a one-context cluster with a single
/// `web-0` pod. Any `cp` whose operands mention `missing` fails.
const CLUSTER: &str = r#"
case "$*" in
  *"config get-contexts"*) printf 'kind-dev\n' ;;
  *"config current-context"*) echo kind-dev ;;
  *"get namespaces"*) printf 'namespace/apps\nnamespace/default\n' ;;
  *"get pods"*) printf 'pod/web-0\npod/worker-0\n' ;;
  *"get pod "*) echo app ;;
  *exec*) printf 'total 8\n-rw-r--r-- 1 root root 5 Jan  2 10:00 a.txt\ndrwxr-xr-x 2 root root 4096 Jan  2 10:00 logs\n' ;;
  *missing*) echo 'error: missing: no such file or directory' >&2; exit 1 ;;
  *cp*) exit 0 ;;
  *) echo "unexpected: $*" >&2; exit 2 ;;
esac
"#;

fn fake_kubectl(dir: &TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("kubectl");
    let log = dir.path().join("args.log");
    let script = format!(
        "#!/bin/sh\nprintf '%s\\n' \"$*\" >> '{}'\n{body}\n",
        log.display()
    );
    std::fs::write(&path, script).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn recorded_args(dir: &TempDir) -> Vec<String> {
    std::fs::read_to_string(dir.path().join("args.log"))
        .unwrap_or_default()
        .lines()
        .map(String::from)
        .collect()
}

fn state_with(dir: &TempDir, body: &str) -> AppState {
    let bin = fake_kubectl(dir, body);
    AppState::new(dir.path().join("home"), Config::default(), Kubectl::new(bin))
}

fn app(dir: &TempDir) -> axum::Router {
    kft_server::build_router(state_with(dir, CLUSTER))
}

/// Send a request via `oneshot` and return (status, parsed JSON body).
async fn send(
    app: axum::Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let builder = axum::http::Request::builder().method(method).uri(uri);
    let req = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(axum::body::Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(axum::body::Body::empty()).unwrap(),
    };
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    send(app, "GET", uri, None).await
}

async fn post_json(
    app: axum::Router,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send(app, "POST", uri, Some(body)).await
}

fn upload_body(local: &str) -> serde_json::Value {
    serde_json::json!({
        "direction": "upload",
        "local_path": local,
        "pod_path": "/tmp",
        "context": "kind-dev",
        "namespace": "apps",
        "pod": "web-0",
    })
}

// ---------------------------------------------------------------------------
// Health and config
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_reports_ok() {
    let dir = TempDir::new().unwrap();
    let (status, body) = get(app(&dir), "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn config_is_served() {
    let dir = TempDir::new().unwrap();
    let (status, body) = get(app(&dir), "/api/config").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["config"]["defaults"]["pod_path"], "/tmp");
}

// ---------------------------------------------------------------------------
// Cluster browsing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn contexts_with_sole_context_selected() {
    let dir = TempDir::new().unwrap();
    let (status, body) = get(app(&dir), "/api/contexts").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["contexts"], serde_json::json!(["kind-dev"]));
    assert_eq!(body["current"], "kind-dev");
    assert_eq!(body["selected"], "kind-dev");
}

#[tokio::test]
async fn namespaces_preselect_default() {
    let dir = TempDir::new().unwrap();
    let (status, body) = get(app(&dir), "/api/namespaces?context=kind-dev").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["namespaces"], serde_json::json!(["apps", "default"]));
    assert_eq!(body["selected"], "default");
    assert_eq!(
        recorded_args(&dir),
        vec!["--context=kind-dev get namespaces -o name"]
    );
}

#[tokio::test]
async fn pods_strip_prefix_and_pass_namespace() {
    let dir = TempDir::new().unwrap();
    let (status, body) = get(app(&dir), "/api/pods?context=kind-dev&namespace=apps").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pods"], serde_json::json!(["web-0", "worker-0"]));
    assert_eq!(
        recorded_args(&dir),
        vec!["--context=kind-dev get pods -o name -n apps"]
    );
}

#[tokio::test]
async fn empty_query_params_are_ignored() {
    let dir = TempDir::new().unwrap();
    let (status, _) = get(app(&dir), "/api/pods?context=&namespace=").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(recorded_args(&dir), vec!["get pods -o name"]);
}

#[tokio::test]
async fn invalid_namespace_is_rejected_before_kubectl() {
    let dir = TempDir::new().unwrap();
    let (status, body) = get(app(&dir), "/api/pods?namespace=Bad_NS").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Bad_NS"));
    assert!(recorded_args(&dir).is_empty());
}

#[tokio::test]
async fn sole_container_is_selected() {
    let dir = TempDir::new().unwrap();
    let (status, body) = get(
        app(&dir),
        "/api/containers?context=kind-dev&namespace=apps&pod=web-0",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["containers"], serde_json::json!(["app"]));
    assert_eq!(body["selected"], "app");
}

#[tokio::test]
async fn kubectl_failure_maps_to_bad_gateway() {
    let dir = TempDir::new().unwrap();
    let router = kft_server::build_router(state_with(
        &dir,
        "echo 'error: You must be logged in to the server (Unauthorized)' >&2; exit 1",
    ));
    let (status, body) = get(router, "/api/namespaces").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().contains("Unauthorized"));
}

#[tokio::test]
async fn missing_kubectl_maps_to_service_unavailable() {
    let dir = TempDir::new().unwrap();
    let state = AppState::new(
        dir.path().join("home"),
        Config::default(),
        Kubectl::new(dir.path().join("no-such-kubectl")),
    );
    let (status, _) = get(kft_server::build_router(state), "/api/contexts").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

// ---------------------------------------------------------------------------
// Pod files
// ---------------------------------------------------------------------------

#[tokio::test]
async fn pod_files_default_to_tmp() {
    let dir = TempDir::new().unwrap();
    let (status, body) = get(
        app(&dir),
        "/api/pod-files?context=kind-dev&namespace=apps&pod=web-0",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["path"], "/tmp");
    assert_eq!(body["entries"].as_array().unwrap().len(), 2);
    assert_eq!(body["entries"][1]["name"], "logs");
    assert_eq!(
        recorded_args(&dir),
        vec!["--context=kind-dev exec web-0 -n apps -- ls -la /tmp"]
    );
}

// ---------------------------------------------------------------------------
// Transfers and history
// ---------------------------------------------------------------------------

#[tokio::test]
async fn upload_runs_cp_and_records_history() {
    let dir = TempDir::new().unwrap();
    let state = state_with(&dir, CLUSTER);

    let (status, body) = post_json(
        kft_server::build_router(state.clone()),
        "/api/transfers",
        upload_body("./notes.txt"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(
        recorded_args(&dir),
        vec!["--context=kind-dev cp ./notes.txt apps/web-0:/tmp"]
    );

    let (status, history) = get(kft_server::build_router(state), "/api/history").await;
    assert_eq!(status, StatusCode::OK);
    let entries = history.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["direction"], "upload");
    assert_eq!(entries[0]["success"], true);
}

#[tokio::test]
async fn failed_copy_is_reported_in_body() {
    let dir = TempDir::new().unwrap();
    let state = state_with(&dir, CLUSTER);
    let (status, body) = post_json(
        kft_server::build_router(state.clone()),
        "/api/transfers",
        upload_body("./missing.txt"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], 1);
    assert!(body["error"].as_str().unwrap().contains("no such file"));

    let (_, history) = get(kft_server::build_router(state), "/api/history").await;
    assert_eq!(history[0]["success"], false);
}

#[tokio::test]
async fn download_with_container() {
    let dir = TempDir::new().unwrap();
    let body = serde_json::json!({
        "direction": "download",
        "local_path": "./out",
        "pod_path": "/var/log/app.log",
        "context": "kind-dev",
        "namespace": "apps",
        "pod": "web-0",
        "container": "app",
    });
    let (status, outcome) = post_json(app(&dir), "/api/transfers", body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["success"], true);
    assert_eq!(
        recorded_args(&dir),
        vec!["--context=kind-dev cp apps/web-0:/var/log/app.log ./out -c app"]
    );
}

#[tokio::test]
async fn incomplete_transfer_is_rejected() {
    let dir = TempDir::new().unwrap();
    let mut body = upload_body("./notes.txt");
    body["namespace"] = serde_json::Value::String(String::new());
    let (status, json) = post_json(app(&dir), "/api/transfers", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("namespace"));
    assert!(recorded_args(&dir).is_empty());
}

#[tokio::test]
async fn missing_local_path_is_rejected() {
    let dir = TempDir::new().unwrap();
    let (status, _) = post_json(app(&dir), "/api/transfers", upload_body("   ")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_direction_is_json_400() {
    let dir = TempDir::new().unwrap();
    let mut body = upload_body("./notes.txt");
    body["direction"] = serde_json::Value::String("sideways".into());
    let (status, json) = post_json(app(&dir), "/api/transfers", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("sideways"));
    assert!(recorded_args(&dir).is_empty());
}

#[tokio::test]
async fn missing_body_field_is_json_400() {
    let dir = TempDir::new().unwrap();
    let body = serde_json::json!({
        "direction": "upload",
        "context": "kind-dev",
        "namespace": "apps",
        "pod": "web-0",
    });
    let (status, json) = post_json(app(&dir), "/api/transfers", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("local_path"));
}

#[tokio::test]
async fn missing_pod_query_is_json_400() {
    let dir = TempDir::new().unwrap();
    let (status, json) = get(app(&dir), "/api/containers?namespace=apps").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("pod"));

    let (status, json) = get(app(&dir), "/api/pod-files?namespace=apps").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_string());
    assert!(recorded_args(&dir).is_empty());
}

#[tokio::test]
async fn second_transfer_conflicts_while_one_runs() {
    let dir = TempDir::new().unwrap();
    let state = state_with(&dir, CLUSTER);
    let _running = state.try_begin_transfer().unwrap();

    let (status, body) = post_json(
        kft_server::build_router(state.clone()),
        "/api/transfers",
        upload_body("./notes.txt"),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("in progress"));
    assert!(recorded_args(&dir).is_empty());
}

#[tokio::test]
async fn slot_is_released_after_transfer() {
    let dir = TempDir::new().unwrap();
    let state = state_with(&dir, CLUSTER);
    for _ in 0..2 {
        let (status, _) = post_json(
            kft_server::build_router(state.clone()),
            "/api/transfers",
            upload_body("./notes.txt"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
    assert!(state.try_begin_transfer().is_some());
}

#[tokio::test]
async fn clear_history_reports_removed() {
    let dir = TempDir::new().unwrap();
    let state = state_with(&dir, CLUSTER);
    post_json(
        kft_server::build_router(state.clone()),
        "/api/transfers",
        upload_body("./notes.txt"),
    )
    .await;

    let (status, body) = send(
        kft_server::build_router(state.clone()),
        "DELETE",
        "/api/history",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["removed"], 1);

    let (_, history) = get(kft_server::build_router(state), "/api/history").await;
    assert_eq!(history, serde_json::json!([]));
}

#[tokio::test]
async fn history_disabled_records_nothing() {
    let dir = TempDir::new().unwrap();
    let bin = fake_kubectl(&dir, CLUSTER);
    let mut config = Config::default();
    config.history.enabled = false;
    let state = AppState::new(dir.path().join("home"), config, Kubectl::new(bin));

    let (status, _) = post_json(
        kft_server::build_router(state.clone()),
        "/api/transfers",
        upload_body("./notes.txt"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (_, history) = get(kft_server::build_router(state), "/api/history").await;
    assert_eq!(history, serde_json::json!([]));
}

#[tokio::test]
async fn clear_waits_for_history_writer() {
    let dir = TempDir::new().unwrap();
    let state = state_with(&dir, CLUSTER);
    post_json(
        kft_server::build_router(state.clone()),
        "/api/transfers",
        upload_body("./notes.txt"),
    )
    .await;

    // Stand in for a transfer that is between loading and saving history.
    let writer = state.history_lock.lock().unwrap();
    let router = kft_server::build_router(state.clone());
    let clear = tokio::spawn(async move { send(router, "DELETE", "/api/history", None).await });

    tokio::time::sleep(std::time::Duration::from_millis(200)).await;
    assert!(!clear.is_finished());

    drop(writer);
    let (status, body) = clear.await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["removed"], 1);
}
