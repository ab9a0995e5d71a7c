// SPDX-FileCopyrightText: 2026 Wavecast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `serve` command: wires the full dispatch stack and runs the gateway.

use std::sync::Arc;

use tracing::info;

use wavecast_config::WavecastConfig;
use wavecast_core::WavecastError;
use wavecast_dispatch::{CampaignService, DispatchEngine, ProgressReporter};
use wavecast_gateway::{start_server, GatewayState, ServerConfig};
use wavecast_store::CampaignStore;
use wavecast_whatsapp::BridgeTransport;

/// Assemble the stack and serve until the process is stopped.
pub async fn run(config: WavecastConfig) -> Result<(), WavecastError> {
    let transport = Arc::new(BridgeTransport::new(&config.bridge)?);

    // Prime the connection flag before accepting submissions, then keep it
    // fresh in the background.
    let connected = transport.refresh_connection_state().await;
    info!(
        bridge = %config.bridge.base_url,
        connected,
        "WhatsApp bridge transport initialized"
    );
    let _status_poll = transport.spawn_status_poll();

    let store = Arc::new(CampaignStore::new());
    let engine = Arc::new(DispatchEngine::new(
        Arc::clone(&store),
        transport.clone(),
        config.campaign.max_concurrent,
    ));
    let service = Arc::new(CampaignService::new(
        Arc::clone(&store),
        engine,
        transport,
        &config.campaign,
        &config.phone,
    ));
    let reporter = Arc::new(ProgressReporter::new(store));

    let server_config = ServerConfig {
        host: config.gateway.host.clone(),
        port: config.gateway.port,
    };
    info!(
        service = %config.service.name,
        max_concurrent = config.campaign.max_concurrent,
        min_delay_ms = config.campaign.min_delay_ms,
        "starting dispatch service"
    );

    start_server(&server_config, GatewayState::new(service, reporter)).await
}
