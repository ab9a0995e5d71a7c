// SPDX-FileCopyrightText: 2026 Wavecast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Wavecast dispatch engine.

use thiserror::Error;

use crate::types::{CampaignId, StatusRecordId};

/// The primary error type used across all Wavecast crates.
#[derive(Debug, Error)]
pub enum WavecastError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// A campaign submission was rejected before any state was created.
    #[error("validation error: {0}")]
    Validation(String),

    /// Query against a campaign id that does not exist.
    #[error("campaign not found: {0}")]
    CampaignNotFound(CampaignId),

    /// Query against a status record id that does not exist.
    #[error("status record not found: {0}")]
    StatusRecordNotFound(StatusRecordId),

    /// Transport errors (session not connected, lookup failure, delivery failure).
    #[error("transport error: {message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl WavecastError {
    /// Build a [`WavecastError::Transport`] from a bare message.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            source: None,
        }
    }

    /// The message recorded on a recipient's status record when a delivery
    /// attempt resolves to this error.
    ///
    /// Transport errors keep their bare message (the routing layer prefix is
    /// noise in a per-recipient failure row); everything else uses the full
    /// display form.
    pub fn delivery_message(&self) -> String {
        match self {
            Self::Transport { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_helper_sets_message_without_source() {
        let err = WavecastError::transport("bridge unreachable");
        match err {
            WavecastError::Transport { message, source } => {
                assert_eq!(message, "bridge unreachable");
                assert!(source.is_none());
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn delivery_message_strips_transport_prefix() {
        let err = WavecastError::transport("Number is not on WhatsApp");
        assert_eq!(err.delivery_message(), "Number is not on WhatsApp");
        assert_eq!(err.to_string(), "transport error: Number is not on WhatsApp");
    }

    #[test]
    fn delivery_message_keeps_display_for_other_variants() {
        let err = WavecastError::Internal("loop cursor lost".into());
        assert_eq!(err.delivery_message(), "internal error: loop cursor lost");
    }

    #[test]
    fn not_found_variants_name_the_id() {
        let err = WavecastError::CampaignNotFound(CampaignId(7));
        assert_eq!(err.to_string(), "campaign not found: 7");

        let err = WavecastError::StatusRecordNotFound(StatusRecordId(12));
        assert_eq!(err.to_string(), "status record not found: 12");
    }
}
