// SPDX-FileCopyrightText: 2026 Wavecast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Messaging transport trait abstracting the WhatsApp session process.
//!
//! The pairing/session transport (QR login, socket lifecycle, reconnects)
//! lives outside this workspace. The dispatch engine consumes it through
//! this trait, injected at construction instead of read from process-wide
//! globals.

use async_trait::async_trait;

use crate::error::WavecastError;
use crate::types::{MessageId, RecipientLookup};

/// Capability for checking recipient reachability and delivering messages.
#[async_trait]
pub trait MessagingTransport: Send + Sync + 'static {
    /// Human-readable name of this transport implementation.
    fn name(&self) -> &str;

    /// Whether the underlying messaging session is currently connected.
    ///
    /// Connection state is owned by the transport process; this must be a
    /// cheap, non-blocking read suitable for calling once per recipient.
    fn is_connected(&self) -> bool;

    /// Resolve a normalized phone number to a routing id.
    ///
    /// Returns `exists = false` when the number is not registered on the
    /// network; errors are reserved for transport-level failures.
    async fn lookup(&self, phone_number: &str) -> Result<RecipientLookup, WavecastError>;

    /// Deliver `content` to a routing id obtained from [`lookup`].
    ///
    /// [`lookup`]: MessagingTransport::lookup
    async fn send(&self, routing_id: &str, content: &str) -> Result<MessageId, WavecastError>;
}
