// SPDX-FileCopyrightText: 2026 Wavecast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The authoritative campaign and status-record repository.

use std::collections::{BTreeMap, HashMap};

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::debug;

use wavecast_core::types::{
    Campaign, CampaignId, CampaignState, DeliveryStatus, GlobalStatistics, StatusRecord,
    StatusRecordId,
};
use wavecast_core::WavecastError;

/// Partial update for a campaign. Unset fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct CampaignUpdate {
    pub state: Option<CampaignState>,
    pub sent_count: Option<u32>,
    pub failed_count: Option<u32>,
}

/// Partial update for a status record. Unset fields are left untouched.
///
/// Setting `status` refreshes the record timestamp.
#[derive(Debug, Clone, Default)]
pub struct StatusRecordUpdate {
    pub status: Option<DeliveryStatus>,
    pub error_message: Option<String>,
}

/// Resolution of one recipient's send attempt.
#[derive(Debug, Clone)]
pub enum DispatchOutcome {
    Sent,
    Failed { error: String },
}

/// What a statistics purge removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct ClearOutcome {
    pub cleared_campaigns: usize,
    pub cleared_records: usize,
}

#[derive(Default)]
struct StoreInner {
    /// Keyed by raw campaign id. Ids are monotonic, so iteration order is
    /// insertion order.
    campaigns: BTreeMap<i64, Campaign>,
    records: BTreeMap<i64, StatusRecord>,
    /// `(campaign id, phone number) -> record ids in creation order`, so the
    /// dispatch loop resolves a recipient's pending record without scanning.
    record_index: HashMap<(i64, String), Vec<i64>>,
    next_campaign_id: i64,
    next_record_id: i64,
}

/// Thread-safe in-memory repository for campaigns and status records.
///
/// Reads return owned snapshots; writes are serialized behind one lock so
/// concurrent dispatch loops and gateway reads never observe a torn update.
pub struct CampaignStore {
    inner: Mutex<StoreInner>,
}

impl CampaignStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(StoreInner {
                next_campaign_id: 1,
                next_record_id: 1,
                ..StoreInner::default()
            }),
        }
    }

    /// Create a campaign in `pending` state with zeroed counters.
    pub async fn create_campaign(
        &self,
        content: impl Into<String>,
        delay_ms: u64,
        recipients: Vec<String>,
    ) -> Campaign {
        let mut inner = self.inner.lock().await;
        let id = inner.next_campaign_id;
        inner.next_campaign_id += 1;

        let campaign = Campaign {
            id: CampaignId(id),
            content: content.into(),
            delay_ms,
            recipients,
            state: CampaignState::Pending,
            sent_count: 0,
            failed_count: 0,
            created_at: Utc::now(),
        };
        inner.campaigns.insert(id, campaign.clone());
        debug!(campaign_id = id, recipients = campaign.recipients.len(), "campaign created");
        campaign
    }

    /// Fetch a campaign snapshot by id.
    pub async fn campaign(&self, id: CampaignId) -> Result<Campaign, WavecastError> {
        let inner = self.inner.lock().await;
        inner
            .campaigns
            .get(&id.0)
            .cloned()
            .ok_or(WavecastError::CampaignNotFound(id))
    }

    /// All campaigns in creation order.
    pub async fn campaigns(&self) -> Vec<Campaign> {
        let inner = self.inner.lock().await;
        inner.campaigns.values().cloned().collect()
    }

    /// Merge `update` into an existing campaign.
    pub async fn update_campaign(
        &self,
        id: CampaignId,
        update: CampaignUpdate,
    ) -> Result<Campaign, WavecastError> {
        let mut inner = self.inner.lock().await;
        let campaign = inner
            .campaigns
            .get_mut(&id.0)
            .ok_or(WavecastError::CampaignNotFound(id))?;

        if let Some(state) = update.state {
            campaign.state = state;
        }
        if let Some(sent) = update.sent_count {
            campaign.sent_count = sent;
        }
        if let Some(failed) = update.failed_count {
            campaign.failed_count = failed;
        }
        Ok(campaign.clone())
    }

    /// Create a status record for one recipient of a campaign.
    pub async fn create_status_record(
        &self,
        campaign_id: CampaignId,
        phone_number: impl Into<String>,
        status: DeliveryStatus,
        error_message: Option<String>,
    ) -> StatusRecord {
        let phone_number = phone_number.into();
        let mut inner = self.inner.lock().await;
        let id = inner.next_record_id;
        inner.next_record_id += 1;

        let record = StatusRecord {
            id: StatusRecordId(id),
            campaign_id,
            phone_number: phone_number.clone(),
            status,
            error_message,
            timestamp: Utc::now(),
        };
        inner.records.insert(id, record.clone());
        inner
            .record_index
            .entry((campaign_id.0, phone_number))
            .or_default()
            .push(id);
        record
    }

    /// Status records belonging to one campaign, in creation order.
    pub async fn status_records(&self, campaign_id: CampaignId) -> Vec<StatusRecord> {
        let inner = self.inner.lock().await;
        inner
            .records
            .values()
            .filter(|r| r.campaign_id == campaign_id)
            .cloned()
            .collect()
    }

    /// Every status record across all campaigns, in creation order.
    pub async fn all_status_records(&self) -> Vec<StatusRecord> {
        let inner = self.inner.lock().await;
        inner.records.values().cloned().collect()
    }

    /// Merge `update` into an existing status record, located by id.
    pub async fn update_status_record(
        &self,
        id: StatusRecordId,
        update: StatusRecordUpdate,
    ) -> Result<StatusRecord, WavecastError> {
        let mut inner = self.inner.lock().await;
        let record = inner
            .records
            .get_mut(&id.0)
            .ok_or(WavecastError::StatusRecordNotFound(id))?;

        if let Some(status) = update.status {
            record.status = status;
            record.timestamp = Utc::now();
        }
        if let Some(error) = update.error_message {
            record.error_message = Some(error);
        }
        Ok(record.clone())
    }

    /// Resolve one recipient's attempt: transition their pending record and
    /// bump the owning campaign's counter as a single atomic operation.
    ///
    /// With duplicate recipients in one campaign, the earliest record still
    /// `pending` for that number is the one resolved, so each attempt
    /// consumes exactly one record.
    pub async fn record_outcome(
        &self,
        campaign_id: CampaignId,
        phone_number: &str,
        outcome: DispatchOutcome,
    ) -> Result<StatusRecord, WavecastError> {
        let mut inner = self.inner.lock().await;

        if !inner.campaigns.contains_key(&campaign_id.0) {
            return Err(WavecastError::CampaignNotFound(campaign_id));
        }

        let record_id = inner
            .record_index
            .get(&(campaign_id.0, phone_number.to_string()))
            .and_then(|ids| {
                ids.iter().copied().find(|id| {
                    inner
                        .records
                        .get(id)
                        .is_some_and(|r| r.status == DeliveryStatus::Pending)
                })
            })
            .ok_or_else(|| {
                WavecastError::Internal(format!(
                    "no pending status record for {phone_number} in campaign {campaign_id}"
                ))
            })?;

        let record = inner
            .records
            .get_mut(&record_id)
            .ok_or(WavecastError::StatusRecordNotFound(StatusRecordId(record_id)))?;
        match &outcome {
            DispatchOutcome::Sent => {
                record.status = DeliveryStatus::Sent;
                record.error_message = None;
            }
            DispatchOutcome::Failed { error } => {
                record.status = DeliveryStatus::Failed;
                record.error_message = Some(error.clone());
            }
        }
        record.timestamp = Utc::now();
        let record = record.clone();

        // Same lock acquisition: the counter can never be observed ahead of
        // (or behind) the record transition.
        let campaign = inner
            .campaigns
            .get_mut(&campaign_id.0)
            .ok_or(WavecastError::CampaignNotFound(campaign_id))?;
        match outcome {
            DispatchOutcome::Sent => campaign.sent_count += 1,
            DispatchOutcome::Failed { .. } => campaign.failed_count += 1,
        }

        Ok(record)
    }

    /// Aggregate statistics across every campaign.
    ///
    /// Pending records are excluded from `total`: the figure reflects only
    /// resolved attempts.
    pub async fn global_statistics(&self) -> GlobalStatistics {
        let inner = self.inner.lock().await;
        let successful = inner
            .records
            .values()
            .filter(|r| r.status == DeliveryStatus::Sent)
            .count() as u64;
        let failed = inner
            .records
            .values()
            .filter(|r| r.status == DeliveryStatus::Failed)
            .count() as u64;
        let total = successful + failed;

        GlobalStatistics {
            total,
            successful,
            failed,
            success_rate: success_rate(successful, total),
        }
    }

    /// Purge completed campaigns and their status records.
    ///
    /// Campaigns still `pending` or `sending` are untouched, so live
    /// dispatch loops never lose the records they are updating.
    pub async fn clear_completed(&self) -> ClearOutcome {
        let mut inner = self.inner.lock().await;

        let completed: Vec<i64> = inner
            .campaigns
            .values()
            .filter(|c| c.state == CampaignState::Completed)
            .map(|c| c.id.0)
            .collect();

        let mut cleared_records = 0;
        for campaign_id in &completed {
            inner.campaigns.remove(campaign_id);
            inner
                .record_index
                .retain(|(cid, _), _| cid != campaign_id);
            let before = inner.records.len();
            inner.records.retain(|_, r| r.campaign_id.0 != *campaign_id);
            cleared_records += before - inner.records.len();
        }

        debug!(
            cleared_campaigns = completed.len(),
            cleared_records, "statistics cleared"
        );
        ClearOutcome {
            cleared_campaigns: completed.len(),
            cleared_records,
        }
    }
}

impl Default for CampaignStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Success percentage rounded to one decimal place; `0.0` with no attempts.
fn success_rate(successful: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (successful as f64 / total as f64 * 1000.0).round() / 10.0
}
