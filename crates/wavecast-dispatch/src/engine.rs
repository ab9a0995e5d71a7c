// SPDX-FileCopyrightText: 2026 Wavecast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The dispatch loop: drives one campaign's recipients through the
//! transport, one at a time, honoring the configured delay.
//!
//! Each campaign runs as an explicit tokio task keyed by campaign id, so
//! supervisory code and tests can await completion deterministically
//! instead of polling. A global semaphore caps how many campaigns dispatch
//! concurrently; queued campaigns stay `pending` until a slot frees.

use std::sync::Arc;
use std::time::Duration;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use wavecast_core::types::{CampaignId, CampaignState, MessageId};
use wavecast_core::{MessagingTransport, WavecastError};
use wavecast_store::{CampaignStore, CampaignUpdate, DispatchOutcome};

/// Failure message recorded when a lookup reports the number unregistered.
pub const NOT_ON_WHATSAPP: &str = "Number is not on WhatsApp";

/// Drives campaigns through the transport with per-campaign tasks.
pub struct DispatchEngine {
    inner: Arc<EngineInner>,
    running: DashMap<CampaignId, JoinHandle<()>>,
}

/// The part of the engine shared with spawned run tasks.
struct EngineInner {
    store: Arc<CampaignStore>,
    transport: Arc<dyn MessagingTransport>,
    permits: Semaphore,
}

impl DispatchEngine {
    pub fn new(
        store: Arc<CampaignStore>,
        transport: Arc<dyn MessagingTransport>,
        max_concurrent: usize,
    ) -> Self {
        Self {
            inner: Arc::new(EngineInner {
                store,
                transport,
                permits: Semaphore::new(max_concurrent),
            }),
            running: DashMap::new(),
        }
    }

    /// Spawn the dispatch run for a campaign.
    ///
    /// Returns `false` without spawning when a run for this campaign is
    /// already live; a second concurrent run would double-count outcomes.
    pub fn spawn_run(&self, campaign_id: CampaignId) -> bool {
        match self.running.entry(campaign_id) {
            Entry::Occupied(mut occupied) => {
                if !occupied.get().is_finished() {
                    warn!(%campaign_id, "dispatch run already live; refusing duplicate");
                    return false;
                }
                let inner = Arc::clone(&self.inner);
                occupied.insert(tokio::spawn(async move { inner.run(campaign_id).await }));
                true
            }
            Entry::Vacant(vacant) => {
                let inner = Arc::clone(&self.inner);
                vacant.insert(tokio::spawn(async move { inner.run(campaign_id).await }));
                true
            }
        }
    }

    /// Whether a dispatch run for this campaign is currently live.
    pub fn is_running(&self, campaign_id: CampaignId) -> bool {
        self.running
            .get(&campaign_id)
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Await the dispatch run for a campaign, if one was spawned.
    ///
    /// Returns `Ok(())` when no run is registered (it already completed and
    /// was joined, or was never spawned).
    pub async fn join(&self, campaign_id: CampaignId) -> Result<(), WavecastError> {
        let Some((_, handle)) = self.running.remove(&campaign_id) else {
            return Ok(());
        };
        handle.await.map_err(|e| {
            WavecastError::Internal(format!(
                "dispatch task for campaign {campaign_id} panicked: {e}"
            ))
        })
    }
}

impl EngineInner {
    /// The sequential send loop for one campaign.
    ///
    /// Every recipient is attempted exactly once, in list order; individual
    /// failures are recorded and never abort the loop. The campaign always
    /// reaches `completed` once it starts sending.
    async fn run(&self, campaign_id: CampaignId) {
        let campaign = match self.store.campaign(campaign_id).await {
            Ok(campaign) => campaign,
            Err(_) => {
                debug!(%campaign_id, "campaign vanished before dispatch; aborting run");
                return;
            }
        };
        if campaign.state != CampaignState::Pending {
            warn!(
                %campaign_id,
                state = %campaign.state,
                "refusing dispatch for non-pending campaign"
            );
            return;
        }

        // Queue behind the global concurrency cap. The permit is held for
        // the whole run; acquire only fails if the semaphore is closed,
        // which never happens here.
        let Ok(_permit) = self.permits.acquire().await else {
            return;
        };

        if let Err(err) = self
            .store
            .update_campaign(
                campaign_id,
                CampaignUpdate {
                    state: Some(CampaignState::Sending),
                    ..CampaignUpdate::default()
                },
            )
            .await
        {
            warn!(%campaign_id, error = %err, "failed to mark campaign sending");
            return;
        }
        info!(
            %campaign_id,
            recipients = campaign.recipients.len(),
            delay_ms = campaign.delay_ms,
            "dispatch started"
        );

        let delay = Duration::from_millis(campaign.delay_ms);
        for (i, recipient) in campaign.recipients.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(delay).await;
            }

            let outcome = match self.attempt(recipient, &campaign.content).await {
                Ok(message_id) => {
                    debug!(%campaign_id, %recipient, message_id = %message_id.0, "message sent");
                    DispatchOutcome::Sent
                }
                Err(err) => {
                    warn!(%campaign_id, %recipient, error = %err, "delivery failed");
                    DispatchOutcome::Failed {
                        error: err.delivery_message(),
                    }
                }
            };

            if let Err(err) = self
                .store
                .record_outcome(campaign_id, recipient, outcome)
                .await
            {
                warn!(%campaign_id, %recipient, error = %err, "failed to record outcome");
            }
        }

        match self
            .store
            .update_campaign(
                campaign_id,
                CampaignUpdate {
                    state: Some(CampaignState::Completed),
                    ..CampaignUpdate::default()
                },
            )
            .await
        {
            Ok(campaign) => info!(
                %campaign_id,
                sent = campaign.sent_count,
                failed = campaign.failed_count,
                "dispatch completed"
            ),
            Err(err) => warn!(%campaign_id, error = %err, "failed to mark campaign completed"),
        }
    }

    /// One recipient's delivery attempt: connectivity check, lookup, send.
    async fn attempt(&self, recipient: &str, content: &str) -> Result<MessageId, WavecastError> {
        if !self.transport.is_connected() {
            return Err(WavecastError::transport("WhatsApp transport is not connected"));
        }

        let lookup = self.transport.lookup(recipient).await?;
        if !lookup.exists {
            return Err(WavecastError::transport(NOT_ON_WHATSAPP));
        }

        self.transport.send(&lookup.routing_id, content).await
    }
}
