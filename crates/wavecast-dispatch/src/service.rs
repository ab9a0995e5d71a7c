// SPDX-FileCopyrightText: 2026 Wavecast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Campaign submission facade.
//!
//! Validates requests, normalizes recipients, seeds the store, and starts
//! the dispatch run. Deliberately thin: everything stateful lives in the
//! store, everything time-shaped in the engine.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use wavecast_config::model::{CampaignConfig, PhoneConfig};
use wavecast_core::types::{
    Campaign, CampaignId, CampaignProgress, DeliveryStatus, StatusRecord,
};
use wavecast_core::{MessagingTransport, PhoneNormalizer, WavecastError};
use wavecast_store::{CampaignStore, ClearOutcome};

use crate::engine::DispatchEngine;

/// A bulk-send request as submitted by a caller.
#[derive(Debug, Clone, Deserialize)]
pub struct CampaignSubmission {
    pub content: String,
    pub delay_ms: u64,
    pub phone_numbers: Vec<String>,
}

/// Acknowledgement returned for an accepted campaign.
#[derive(Debug, Clone, Serialize)]
pub struct CampaignAccepted {
    pub campaign_id: CampaignId,
    pub total_recipients: usize,
}

/// Full per-campaign view: the campaign, its records, and derived progress.
#[derive(Debug, Clone, Serialize)]
pub struct CampaignStatus {
    pub campaign: Campaign,
    pub status_records: Vec<StatusRecord>,
    pub progress: CampaignProgress,
}

/// Orchestration facade wiring normalizer, store, and engine together.
pub struct CampaignService {
    store: Arc<CampaignStore>,
    engine: Arc<DispatchEngine>,
    transport: Arc<dyn MessagingTransport>,
    normalizer: PhoneNormalizer,
    min_delay_ms: u64,
    min_digits: usize,
    max_digits: usize,
}

impl CampaignService {
    pub fn new(
        store: Arc<CampaignStore>,
        engine: Arc<DispatchEngine>,
        transport: Arc<dyn MessagingTransport>,
        campaign_config: &CampaignConfig,
        phone_config: &PhoneConfig,
    ) -> Self {
        Self {
            store,
            engine,
            transport,
            normalizer: PhoneNormalizer::new(
                phone_config.country_code.clone(),
                phone_config.trunk_prefix.clone(),
            ),
            min_delay_ms: campaign_config.min_delay_ms,
            min_digits: phone_config.min_digits,
            max_digits: phone_config.max_digits,
        }
    }

    /// Validate and accept a campaign, then start its dispatch run.
    ///
    /// Rejection happens before any state is created; an accepted campaign
    /// is already dispatching when this returns.
    pub async fn submit_campaign(
        &self,
        submission: CampaignSubmission,
    ) -> Result<CampaignAccepted, WavecastError> {
        if submission.content.trim().is_empty() {
            return Err(WavecastError::Validation(
                "message content must not be empty".to_string(),
            ));
        }
        if submission.delay_ms < self.min_delay_ms {
            return Err(WavecastError::Validation(format!(
                "delay must be at least {}ms, got {}ms",
                self.min_delay_ms, submission.delay_ms
            )));
        }
        if submission.phone_numbers.is_empty() {
            return Err(WavecastError::Validation(
                "at least one phone number is required".to_string(),
            ));
        }
        if !self.transport.is_connected() {
            return Err(WavecastError::Validation(
                "WhatsApp is not connected; scan the QR code first".to_string(),
            ));
        }

        let recipients = self.normalize_recipients(&submission.phone_numbers)?;

        let campaign = self
            .store
            .create_campaign(submission.content, submission.delay_ms, recipients)
            .await;
        for number in &campaign.recipients {
            self.store
                .create_status_record(campaign.id, number, DeliveryStatus::Pending, None)
                .await;
        }

        self.engine.spawn_run(campaign.id);
        info!(
            campaign_id = %campaign.id,
            recipients = campaign.recipients.len(),
            "campaign accepted"
        );

        Ok(CampaignAccepted {
            campaign_id: campaign.id,
            total_recipients: campaign.recipients.len(),
        })
    }

    /// The campaign, its status records, and derived progress.
    pub async fn campaign_status(
        &self,
        campaign_id: CampaignId,
    ) -> Result<CampaignStatus, WavecastError> {
        let campaign = self.store.campaign(campaign_id).await?;
        let status_records = self.store.status_records(campaign_id).await;
        let progress = campaign.progress();
        Ok(CampaignStatus {
            campaign,
            status_records,
            progress,
        })
    }

    /// All campaigns in submission order.
    pub async fn campaigns(&self) -> Vec<Campaign> {
        self.store.campaigns().await
    }

    /// Purge completed campaigns and their records.
    pub async fn clear_statistics(&self) -> ClearOutcome {
        self.store.clear_completed().await
    }

    /// Whether the transport session is currently connected.
    pub fn transport_connected(&self) -> bool {
        self.transport.is_connected()
    }

    fn normalize_recipients(&self, raw_numbers: &[String]) -> Result<Vec<String>, WavecastError> {
        let mut recipients = Vec::with_capacity(raw_numbers.len());
        for raw in raw_numbers {
            let normalized = self.normalizer.normalize(raw);
            let digits = normalized.len();
            if digits < self.min_digits || digits > self.max_digits {
                return Err(WavecastError::Validation(format!(
                    "`{raw}` does not normalize to a dialable number ({digits} digits, want {}-{})",
                    self.min_digits, self.max_digits
                )));
            }
            recipients.push(normalized);
        }
        Ok(recipients)
    }
}
