use crate::session::Session;
use anyhow::Context;
use kft_server::state::AppState;

pub fn run(session: &Session, port: Option<u16>) -> anyhow::Result<()> {
    let kubectl = session.kubectl()?;
    let port = port.unwrap_or(session.config.server.port);
    let state = AppState::new(session.home.clone(), session.config.clone(), kubectl);

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .with_context(|| format!("failed to bind 127.0.0.1:{port}"))?;
        let actual_port = listener.local_addr()?.port();
        println!("kft bridge → http://127.0.0.1:{actual_port}  (PID {})", std::process::id());

        tokio::select! {
            res = kft_server::serve_on(state, listener) => res,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutting down");
                Ok(())
            }
        }
    })
}
