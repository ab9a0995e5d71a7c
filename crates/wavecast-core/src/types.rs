// SPDX-FileCopyrightText: 2026 Wavecast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the Wavecast workspace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Unique identifier for a campaign. Allocated monotonically by the store.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct CampaignId(pub i64);

impl std::fmt::Display for CampaignId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Unique identifier for a per-recipient status record.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct StatusRecordId(pub i64);

impl std::fmt::Display for StatusRecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifier assigned by the transport to a delivered message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

/// Lifecycle state of a campaign.
///
/// Transitions are one-way: `Pending -> Sending` when the dispatch loop
/// starts, `Sending -> Completed` when every recipient has resolved.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CampaignState {
    Pending,
    Sending,
    Completed,
}

/// Delivery outcome of a single recipient within a campaign.
///
/// `Sent` and `Failed` are terminal; a record transitions out of `Pending`
/// exactly once.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Pending,
    Sent,
    Failed,
}

/// One bulk-send request: a message body, an inter-send delay, and an
/// ordered list of normalized recipient numbers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
    pub id: CampaignId,
    pub content: String,
    /// Floor on the pause between consecutive send attempts, in milliseconds.
    pub delay_ms: u64,
    pub recipients: Vec<String>,
    pub state: CampaignState,
    pub sent_count: u32,
    pub failed_count: u32,
    pub created_at: DateTime<Utc>,
}

/// The per-recipient delivery outcome for one campaign.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusRecord {
    pub id: StatusRecordId,
    pub campaign_id: CampaignId,
    pub phone_number: String,
    pub status: DeliveryStatus,
    /// Present only when `status` is [`DeliveryStatus::Failed`].
    pub error_message: Option<String>,
    /// Time of the last status change.
    pub timestamp: DateTime<Utc>,
}

impl Campaign {
    /// Progress counters derived from the recipient list and resolution
    /// counts. `pending` is what has not resolved yet.
    pub fn progress(&self) -> CampaignProgress {
        let total = self.recipients.len() as u32;
        CampaignProgress {
            total,
            sent: self.sent_count,
            failed: self.failed_count,
            pending: total.saturating_sub(self.sent_count + self.failed_count),
        }
    }
}

/// Progress counters for one campaign, derived from the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignProgress {
    pub total: u32,
    pub sent: u32,
    pub failed: u32,
    pub pending: u32,
}

/// Aggregate delivery statistics across all campaigns.
///
/// `total` counts only resolved attempts (`Sent` + `Failed`); recipients
/// still pending are excluded. `success_rate` is a percentage rounded to
/// one decimal place, `0.0` when no attempt has resolved yet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlobalStatistics {
    pub total: u64,
    pub successful: u64,
    pub failed: u64,
    pub success_rate: f64,
}

/// Result of a transport-side recipient lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipientLookup {
    /// Whether the number is registered on the messaging network.
    pub exists: bool,
    /// Opaque routing id to pass to `send` (a JID for WhatsApp transports).
    pub routing_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn campaign_state_round_trips_through_strings() {
        for state in [
            CampaignState::Pending,
            CampaignState::Sending,
            CampaignState::Completed,
        ] {
            let s = state.to_string();
            assert_eq!(CampaignState::from_str(&s).unwrap(), state);
        }
        assert_eq!(CampaignState::Sending.to_string(), "sending");
    }

    #[test]
    fn delivery_status_serializes_lowercase() {
        let json = serde_json::to_string(&DeliveryStatus::Failed).unwrap();
        assert_eq!(json, "\"failed\"");
        let parsed: DeliveryStatus = serde_json::from_str("\"sent\"").unwrap();
        assert_eq!(parsed, DeliveryStatus::Sent);
    }

    #[test]
    fn campaign_id_serializes_as_bare_integer() {
        let json = serde_json::to_string(&CampaignId(42)).unwrap();
        assert_eq!(json, "42");
        let parsed: CampaignId = serde_json::from_str("42").unwrap();
        assert_eq!(parsed, CampaignId(42));
    }

    #[test]
    fn progress_serializes_all_counters() {
        let progress = CampaignProgress {
            total: 3,
            sent: 1,
            failed: 1,
            pending: 1,
        };
        let json = serde_json::to_string(&progress).unwrap();
        assert!(json.contains("\"total\":3"));
        assert!(json.contains("\"pending\":1"));
    }
}
