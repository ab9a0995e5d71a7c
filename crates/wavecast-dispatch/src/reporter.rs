// SPDX-FileCopyrightText: 2026 Wavecast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read-side progress and statistics queries.
//!
//! Pure queries over the store: nothing here mutates state. Polling UIs
//! hit these between submissions.

use std::sync::Arc;

use wavecast_core::types::{CampaignId, CampaignProgress, GlobalStatistics, StatusRecord};
use wavecast_core::WavecastError;
use wavecast_store::CampaignStore;

/// Read-only views over [`CampaignStore`].
pub struct ProgressReporter {
    store: Arc<CampaignStore>,
}

impl ProgressReporter {
    pub fn new(store: Arc<CampaignStore>) -> Self {
        Self { store }
    }

    /// Progress counters for one campaign.
    pub async fn campaign_progress(
        &self,
        campaign_id: CampaignId,
    ) -> Result<CampaignProgress, WavecastError> {
        let campaign = self.store.campaign(campaign_id).await?;
        Ok(campaign.progress())
    }

    /// Every status record across all campaigns.
    pub async fn all_status_records(&self) -> Vec<StatusRecord> {
        self.store.all_status_records().await
    }

    /// Aggregate statistics across all campaigns.
    pub async fn global_statistics(&self) -> GlobalStatistics {
        self.store.global_statistics().await
    }
}
