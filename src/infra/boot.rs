use crate::infra::config::Config;
use crate::infra::http_app::{build_app, build_dispatcher, MCP_PATH};

fn now_local() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

pub async fn run_server(cfg: Config) -> anyhow::Result<()> {
    tracing::info!(
        mode = %cfg.mode,
        host = %cfg.host,
        port = cfg.port,
        "BOOT local-mcp-demo"
    );

    let dispatcher = build_dispatcher(&cfg);

    // Stdio mode: run MCP over stdio ONLY (no HTTP).
    if cfg.is_stdio() {
        return crate::infra::runtime::mcp_transport::serve_stdio(dispatcher).await;
    }

    let app = build_app(dispatcher);
    let listener = tokio::net::TcpListener::bind((cfg.host.as_str(), cfg.port)).await?;
    tracing::info!(
        started_at = %now_local(),
        url = %format!("http://127.0.0.1:{}{}", cfg.port, MCP_PATH),
        "MCP server listening"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!(stopped_at = %now_local(), "MCP server stopped");
    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("MCP server shutting down");
}
