use anyhow::{Context, Result};
use axum::http::{HeaderValue, Method, header};
use std::net::{Ipv4Addr, SocketAddr};
use tandem_core::utils::DEFAULT_RELAY_PORT;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// Relay server settings.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub bind_addr: SocketAddr,
    /// Origins allowed by CORS. Empty means any origin.
    pub allowed_origins: Vec<String>,
    /// Send `user:left` to the remaining room members on disconnect.
    pub notify_on_leave: bool,
    /// Capacity of the registry command queue.
    pub registry_capacity: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_RELAY_PORT)),
            allowed_origins: Vec::new(),
            notify_on_leave: false,
            registry_capacity: 256,
        }
    }
}

impl RelayConfig {
    pub fn cors_layer(&self) -> Result<CorsLayer> {
        let layer = CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE]);

        if self.allowed_origins.is_empty() {
            return Ok(layer.allow_origin(Any));
        }

        let origins = self
            .allowed_origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin).with_context(|| format!("Invalid CORS origin '{origin}'"))
            })
            .collect::<Result<Vec<_>>>()?;

        // Credentials are only allowed together with an explicit origin list.
        Ok(layer
            .allow_origin(AllowOrigin::list(origins))
            .allow_credentials(true))
    }
}
