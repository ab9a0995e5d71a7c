// SPDX-FileCopyrightText: 2026 Wavecast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait definitions for external capabilities consumed by the dispatch engine.

pub mod transport;

pub use transport::MessagingTransport;
