use axum::extract::State;
use axum::Json;
use kft_core::config::Config;

use crate::state::AppState;

/// GET /api/config — the configuration the bridge was started with, plus
/// the kubectl binary in use. Read-only; edit with `kft config set`.
pub async fn get_config(State(app): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "config": Config::clone(&app.config),
        "kubectl": app.kubectl.binary().display().to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use kft_core::kubectl::Kubectl;
    use std::path::PathBuf;

    #[tokio::test]
    async fn get_config_reports_defaults_and_binary() {
        let state = AppState::new(
            PathBuf::from("/tmp/kft"),
            Config::default(),
            Kubectl::new("/usr/local/bin/kubectl"),
        );
        let Json(body) = get_config(State(state)).await;
        assert_eq!(body["config"]["defaults"]["pod_path"], "/tmp");
        assert_eq!(body["config"]["history"]["max_entries"], 50);
        assert_eq!(body["kubectl"], "/usr/local/bin/kubectl");
    }
}
