// SPDX-FileCopyrightText: 2026 Wavecast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles the complete dispatch stack (store, mock
//! transport, engine, service, reporter) the way the binary wires it.
//! `submit()` drives the full submission path; `run_to_completion()` awaits
//! the campaign's dispatch task deterministically.

use std::sync::Arc;

use wavecast_config::model::{CampaignConfig, PhoneConfig};
use wavecast_core::types::CampaignId;
use wavecast_core::WavecastError;
use wavecast_dispatch::{
    CampaignAccepted, CampaignService, CampaignSubmission, DispatchEngine, ProgressReporter,
};
use wavecast_store::CampaignStore;

use crate::mock_transport::MockTransport;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    connected: bool,
    campaign_config: CampaignConfig,
    phone_config: PhoneConfig,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            connected: true,
            campaign_config: CampaignConfig::default(),
            phone_config: PhoneConfig::default(),
        }
    }

    /// Start with the transport reporting no session.
    pub fn disconnected(mut self) -> Self {
        self.connected = false;
        self
    }

    /// Cap concurrent campaign runs.
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.campaign_config.max_concurrent = max_concurrent;
        self
    }

    /// Override the accepted delay floor.
    pub fn with_min_delay_ms(mut self, min_delay_ms: u64) -> Self {
        self.campaign_config.min_delay_ms = min_delay_ms;
        self
    }

    /// Override the dial plan.
    pub fn with_phone_config(mut self, phone_config: PhoneConfig) -> Self {
        self.phone_config = phone_config;
        self
    }

    /// Build the harness, wiring the stack the way the binary does.
    pub fn build(self) -> TestHarness {
        let store = Arc::new(CampaignStore::new());
        let transport = Arc::new(if self.connected {
            MockTransport::connected()
        } else {
            MockTransport::disconnected()
        });
        let engine = Arc::new(DispatchEngine::new(
            Arc::clone(&store),
            transport.clone(),
            self.campaign_config.max_concurrent,
        ));
        let service = Arc::new(CampaignService::new(
            Arc::clone(&store),
            Arc::clone(&engine),
            transport.clone(),
            &self.campaign_config,
            &self.phone_config,
        ));
        let reporter = Arc::new(ProgressReporter::new(Arc::clone(&store)));

        TestHarness {
            store,
            transport,
            engine,
            service,
            reporter,
        }
    }
}

/// A fully wired dispatch stack over a mock transport.
pub struct TestHarness {
    pub store: Arc<CampaignStore>,
    pub transport: Arc<MockTransport>,
    pub engine: Arc<DispatchEngine>,
    pub service: Arc<CampaignService>,
    pub reporter: Arc<ProgressReporter>,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Submit a campaign through the service.
    pub async fn submit(
        &self,
        content: &str,
        delay_ms: u64,
        phone_numbers: &[&str],
    ) -> Result<CampaignAccepted, WavecastError> {
        self.service
            .submit_campaign(CampaignSubmission {
                content: content.to_string(),
                delay_ms,
                phone_numbers: phone_numbers.iter().map(|n| n.to_string()).collect(),
            })
            .await
    }

    /// Await the dispatch task spawned for a campaign.
    pub async fn run_to_completion(&self, campaign_id: CampaignId) -> Result<(), WavecastError> {
        self.engine.join(campaign_id).await
    }
}
