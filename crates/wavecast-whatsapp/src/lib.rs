// SPDX-FileCopyrightText: 2026 Wavecast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WhatsApp bridge transport for the Wavecast dispatch engine.
//!
//! Implements [`MessagingTransport`] against the external bridge process
//! that owns the WhatsApp Web session. Pairing (QR login) happens in the
//! bridge; this crate only checks reachability and delivers messages.
//!
//! [`MessagingTransport`]: wavecast_core::MessagingTransport

pub mod transport;

pub use transport::BridgeTransport;
