// SPDX-FileCopyrightText: 2026 Wavecast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway exposing the Wavecast campaign operations.
//!
//! Binds the logical operations (submit, status, records, statistics,
//! connection) to REST routes. Transport-agnostic callers should depend on
//! `wavecast-dispatch` directly; this crate only adds the HTTP shape.

pub mod handlers;
pub mod server;

pub use server::{router, start_server, GatewayState, ServerConfig};
