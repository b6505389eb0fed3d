use crate::config::RelayConfig;
use crate::signaling::{SignalingService, ws_handler};
use anyhow::{Context, Result};
use axum::Router;
use axum::routing::get;
use std::future::Future;
use tandem_core::utils::SIGNALING_PATH;
use tokio::net::TcpListener;
use tracing::info;

pub const HEALTH_RESPONSE: &str = "tandem signaling relay is running";

pub async fn health() -> &'static str {
    HEALTH_RESPONSE
}

/// Liveness check on `/`, signaling WebSocket on `/ws`.
pub fn router(service: SignalingService, config: &RelayConfig) -> Result<Router> {
    let cors = config.cors_layer()?;

    Ok(Router::new()
        .route("/", get(health))
        .route(SIGNALING_PATH, get(ws_handler))
        .layer(cors)
        .with_state(service))
}

/// Runs the relay on an already bound listener until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, config: RelayConfig, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let service = SignalingService::spawn(config.registry_capacity, config.notify_on_leave);
    let app = router(service, &config)?;

    let addr = listener.local_addr().context("Listener has no local address")?;
    info!("Signaling relay listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("Relay server failed")
}

/// Binds `config.bind_addr` and serves until `shutdown` resolves.
pub async fn bind_and_serve<F>(config: RelayConfig, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;

    serve(listener, config, shutdown).await
}
