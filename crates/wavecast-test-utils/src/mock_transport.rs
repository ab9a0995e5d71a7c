// SPDX-FileCopyrightText: 2026 Wavecast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock messaging transport for deterministic testing.
//!
//! `MockTransport` implements `MessagingTransport` with injectable
//! connectivity, per-number lookup results, per-number send failures, and
//! captured outbound messages for assertion in tests.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;

use wavecast_core::types::{MessageId, RecipientLookup};
use wavecast_core::{MessagingTransport, WavecastError};

/// One message captured by [`MockTransport::send`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub routing_id: String,
    pub content: String,
}

/// A mock WhatsApp transport for testing.
///
/// Lookups resolve every number to a `<digits>@s.whatsapp.net` routing id
/// unless the number was marked missing. Sends succeed and are captured
/// unless the number was marked failing.
pub struct MockTransport {
    connected: AtomicBool,
    sent: Mutex<Vec<SentMessage>>,
    missing: Mutex<HashSet<String>>,
    failing: Mutex<HashSet<String>>,
    attempts: Mutex<Vec<Instant>>,
}

impl MockTransport {
    /// A transport reporting a live session.
    pub fn connected() -> Self {
        Self::with_connectivity(true)
    }

    /// A transport reporting no session (QR code never scanned).
    pub fn disconnected() -> Self {
        Self::with_connectivity(false)
    }

    fn with_connectivity(connected: bool) -> Self {
        Self {
            connected: AtomicBool::new(connected),
            sent: Mutex::new(Vec::new()),
            missing: Mutex::new(HashSet::new()),
            failing: Mutex::new(HashSet::new()),
            attempts: Mutex::new(Vec::new()),
        }
    }

    /// Flip the reported connection state mid-test.
    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    /// Make `lookup` report this number as not registered on the network.
    pub async fn mark_missing(&self, number: &str) {
        self.missing.lock().await.insert(number.to_string());
    }

    /// Make `send` fail for this number's routing id.
    pub async fn fail_send_to(&self, number: &str) {
        self.failing.lock().await.insert(number.to_string());
    }

    /// All messages captured by `send`, in delivery order.
    pub async fn sent_messages(&self) -> Vec<SentMessage> {
        self.sent.lock().await.clone()
    }

    /// Count of messages captured by `send`.
    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    /// The instant each delivery attempt reached `lookup`, in order.
    ///
    /// Uses `tokio::time::Instant`, so paused-clock tests can assert on
    /// virtual-time spacing between attempts.
    pub async fn attempt_instants(&self) -> Vec<Instant> {
        self.attempts.lock().await.clone()
    }
}

#[async_trait]
impl MessagingTransport for MockTransport {
    fn name(&self) -> &str {
        "mock-transport"
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn lookup(&self, phone_number: &str) -> Result<RecipientLookup, WavecastError> {
        self.attempts.lock().await.push(Instant::now());
        let exists = !self.missing.lock().await.contains(phone_number);
        Ok(RecipientLookup {
            exists,
            routing_id: format!("{phone_number}@s.whatsapp.net"),
        })
    }

    async fn send(&self, routing_id: &str, content: &str) -> Result<MessageId, WavecastError> {
        let number = routing_id.split('@').next().unwrap_or(routing_id);
        if self.failing.lock().await.contains(number) {
            return Err(WavecastError::transport(format!(
                "delivery to {number} failed"
            )));
        }

        self.sent.lock().await.push(SentMessage {
            routing_id: routing_id.to_string(),
            content: content.to_string(),
        });
        Ok(MessageId(format!("mock-msg-{}", uuid::Uuid::new_v4())))
    }
}
