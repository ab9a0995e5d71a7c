// SPDX-FileCopyrightText: 2026 Wavecast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use wavecast_core::WavecastError;
use wavecast_dispatch::{CampaignService, ProgressReporter};

use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// Campaign submission and status facade.
    pub service: Arc<CampaignService>,
    /// Read-side progress and statistics queries.
    pub reporter: Arc<ProgressReporter>,
    /// Process start time for uptime reporting.
    pub start_time: Instant,
}

impl GatewayState {
    pub fn new(service: Arc<CampaignService>, reporter: Arc<ProgressReporter>) -> Self {
        Self {
            service,
            reporter,
            start_time: Instant::now(),
        }
    }
}

/// Gateway server configuration (mirrors GatewayConfig from wavecast-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

/// Build the gateway router.
///
/// Exposed separately from [`start_server`] so tests can drive routes
/// in-process without binding a socket.
pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route("/health", get(handlers::get_health))
        .route(
            "/v1/campaigns",
            post(handlers::post_campaigns).get(handlers::get_campaigns),
        )
        .route("/v1/campaigns/{id}", get(handlers::get_campaign_status))
        .route("/v1/status-records", get(handlers::get_status_records))
        .route("/v1/statistics", get(handlers::get_statistics))
        .route("/v1/statistics/clear", post(handlers::post_clear_statistics))
        .route("/v1/connection", get(handlers::get_connection))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the gateway HTTP server.
pub async fn start_server(config: &ServerConfig, state: GatewayState) -> Result<(), WavecastError> {
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| WavecastError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| WavecastError::Internal(format!("gateway server error: {e}")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_config_debug() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8820,
        };
        let debug = format!("{config:?}");
        assert!(debug.contains("127.0.0.1"));
        assert!(debug.contains("8820"));
    }
}
