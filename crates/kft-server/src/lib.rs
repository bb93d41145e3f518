pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use state::AppState;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the axum Router with all API routes and middleware.
/// Used by `serve_on()` and available for integration testing.
pub fn build_router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(routes::health))
        // Cluster browsing
        .route("/api/contexts", get(routes::cluster::get_contexts))
        .route("/api/namespaces", get(routes::cluster::get_namespaces))
        .route("/api/pods", get(routes::cluster::get_pods))
        .route("/api/containers", get(routes::cluster::get_containers))
        .route("/api/pod-files", get(routes::files::list_pod_files))
        // Transfers
        .route("/api/transfers", post(routes::transfers::create_transfer))
        // History
        .route(
            "/api/history",
            get(routes::history::list_history).delete(routes::history::clear_history),
        )
        // Config
        .route("/api/config", get(routes::config::get_config))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// Serve the bridge on a pre-bound listener.
///
/// Accepting a bound `TcpListener` lets the caller read the actual port
/// before starting (useful when `port = 0` and the OS picks a free port).
pub async fn serve_on(app_state: AppState, listener: tokio::net::TcpListener) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let app = build_router(app_state);

    tracing::info!("kft bridge listening on http://127.0.0.1:{actual_port}");

    axum::serve(listener, app).await?;
    Ok(())
}
