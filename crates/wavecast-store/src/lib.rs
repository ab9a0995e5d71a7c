// SPDX-FileCopyrightText: 2026 Wavecast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory persistence layer for the Wavecast dispatch engine.
//!
//! Owns every [`Campaign`] and [`StatusRecord`] instance for the lifetime of
//! the process. All mutation goes through one internal lock, so a dispatch
//! loop's status-record transition and counter increment are observed
//! together or not at all.
//!
//! [`Campaign`]: wavecast_core::Campaign
//! [`StatusRecord`]: wavecast_core::StatusRecord

pub mod store;

pub use store::{CampaignStore, CampaignUpdate, ClearOutcome, DispatchOutcome, StatusRecordUpdate};
