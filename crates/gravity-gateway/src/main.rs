//! Gravity API gateway
//!
//! - Policy gate: host / origin / method allowlists
//! - Route table: /healthz, /wa/webhook, /rag/embed, /rag/ask, /insights/run
//! - Uniform `{success, message, data}` envelopes, errors included
//! - Graceful shutdown: readiness flips to draining, in-flight requests finish

use gravity_gateway::{app_state, config, obs, router, services};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::load_from_env()?;
    obs::logging::init(cfg.log_format());

    let listen = cfg.listen_addr();
    tracing::info!(
        service = "gravity-api",
        version = services::API_VERSION,
        environment = %cfg.environment,
        allowed_hosts = ?cfg.access.allowed_hosts,
        allowed_origins = ?cfg.access.allowed_origins,
        upstream_timeout_ms = cfg.upstream.timeout_ms,
        "configuration loaded"
    );

    let state = app_state::AppState::new(cfg)?;
    let app = router::build_router(state.clone());

    let listener = tokio::net::TcpListener::bind(&listen).await?;
    tracing::info!(address = %listener.local_addr()?, "gravity-gateway listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state))
        .await?;

    tracing::info!("shutdown complete");
    Ok(())
}

async fn shutdown_signal(state: app_state::AppState) {
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

    state.metrics().set_draining();
    tracing::info!("shutdown signal received, draining");
}
