// SPDX-FileCopyrightText: 2026 Wavecast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Wavecast bulk-dispatch engine.
//!
//! This crate provides the foundational trait definitions, error types,
//! domain types, and phone-number normalization used throughout the
//! Wavecast workspace.

pub mod error;
pub mod normalize;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::WavecastError;
pub use normalize::PhoneNormalizer;
pub use traits::MessagingTransport;
pub use types::{
    Campaign, CampaignId, CampaignProgress, CampaignState, DeliveryStatus, GlobalStatistics,
    MessageId, RecipientLookup, StatusRecord, StatusRecordId,
};
