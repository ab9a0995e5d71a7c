// SPDX-FileCopyrightText: 2026 Wavecast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the WhatsApp bridge sidecar.
//!
//! The bridge owns the actual WhatsApp Web session (QR pairing, socket
//! lifecycle, reconnects) and exposes a small HTTP API. This transport is
//! only the client plumbing: connection state is polled into a local flag
//! so `is_connected()` stays a cheap, non-blocking read.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use wavecast_config::model::BridgeConfig;
use wavecast_core::types::{MessageId, RecipientLookup};
use wavecast_core::{MessagingTransport, WavecastError};

/// Bridge response for `GET /status`.
#[derive(Debug, Deserialize)]
struct StatusResponse {
    connected: bool,
}

/// Bridge response for `GET /exists/{number}`.
#[derive(Debug, Deserialize)]
struct ExistsResponse {
    exists: bool,
    /// JID assigned by the network; absent when `exists` is false.
    #[serde(default)]
    jid: Option<String>,
}

/// Bridge request body for `POST /send`.
#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    jid: &'a str,
    text: &'a str,
}

/// Bridge response for `POST /send`.
#[derive(Debug, Deserialize)]
struct SendResponse {
    #[serde(default)]
    message_id: Option<String>,
}

/// `MessagingTransport` over the WhatsApp bridge HTTP API.
///
/// Cheap to clone: the HTTP client pools connections internally and the
/// connection flag is shared across clones.
#[derive(Debug, Clone)]
pub struct BridgeTransport {
    client: reqwest::Client,
    base_url: String,
    poll_period: Duration,
    connected: Arc<AtomicBool>,
}

impl BridgeTransport {
    pub fn new(config: &BridgeConfig) -> Result<Self, WavecastError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| WavecastError::Transport {
                message: format!("failed to build bridge HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            poll_period: Duration::from_secs(config.status_poll_secs),
            connected: Arc::new(AtomicBool::new(false)),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Fetch the bridge connection state once and cache it.
    ///
    /// An unreachable bridge counts as disconnected.
    pub async fn refresh_connection_state(&self) -> bool {
        let connected = match self.fetch_status().await {
            Ok(connected) => connected,
            Err(err) => {
                debug!(error = %err, "bridge status poll failed");
                false
            }
        };
        self.connected.store(connected, Ordering::SeqCst);
        connected
    }

    /// Spawn the background task keeping the connection flag fresh.
    pub fn spawn_status_poll(&self) -> tokio::task::JoinHandle<()> {
        let transport = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(transport.poll_period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let connected = transport.refresh_connection_state().await;
                if !connected {
                    warn!("WhatsApp bridge reports no session");
                }
            }
        })
    }

    async fn fetch_status(&self) -> Result<bool, WavecastError> {
        let response: StatusResponse = self
            .client
            .get(self.endpoint("status"))
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(bridge_error("status request failed"))?
            .json()
            .await
            .map_err(bridge_error("status response malformed"))?;
        Ok(response.connected)
    }
}

/// Map a reqwest error into a transport error with a stable prefix.
fn bridge_error(context: &'static str) -> impl Fn(reqwest::Error) -> WavecastError {
    move |e| WavecastError::Transport {
        message: format!("{context}: {e}"),
        source: Some(Box::new(e)),
    }
}

#[async_trait]
impl MessagingTransport for BridgeTransport {
    fn name(&self) -> &str {
        "whatsapp-bridge"
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn lookup(&self, phone_number: &str) -> Result<RecipientLookup, WavecastError> {
        let response: ExistsResponse = self
            .client
            .get(self.endpoint(&format!("exists/{phone_number}")))
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(bridge_error("lookup request failed"))?
            .json()
            .await
            .map_err(bridge_error("lookup response malformed"))?;

        Ok(RecipientLookup {
            exists: response.exists,
            routing_id: response
                .jid
                .unwrap_or_else(|| format!("{phone_number}@s.whatsapp.net")),
        })
    }

    async fn send(&self, routing_id: &str, content: &str) -> Result<MessageId, WavecastError> {
        let response: SendResponse = self
            .client
            .post(self.endpoint("send"))
            .json(&SendRequest {
                jid: routing_id,
                text: content,
            })
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(bridge_error("send request failed"))?
            .json()
            .await
            .map_err(bridge_error("send response malformed"))?;

        Ok(MessageId(
            response.message_id.unwrap_or_else(|| "unacked".to_string()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport() -> BridgeTransport {
        BridgeTransport::new(&BridgeConfig::default()).unwrap()
    }

    #[test]
    fn endpoints_join_without_double_slashes() {
        let transport = BridgeTransport::new(&BridgeConfig {
            base_url: "http://127.0.0.1:3001/".to_string(),
            status_poll_secs: 5,
        })
        .unwrap();
        assert_eq!(transport.endpoint("status"), "http://127.0.0.1:3001/status");
        assert_eq!(
            transport.endpoint("/exists/2348031234567"),
            "http://127.0.0.1:3001/exists/2348031234567"
        );
    }

    #[test]
    fn starts_disconnected_until_first_poll() {
        assert!(!transport().is_connected());
    }

    #[test]
    fn exists_response_tolerates_missing_jid() {
        let parsed: ExistsResponse = serde_json::from_str(r#"{"exists": false}"#).unwrap();
        assert!(!parsed.exists);
        assert!(parsed.jid.is_none());

        let parsed: ExistsResponse = serde_json::from_str(
            r#"{"exists": true, "jid": "2348031234567@s.whatsapp.net"}"#,
        )
        .unwrap();
        assert_eq!(parsed.jid.as_deref(), Some("2348031234567@s.whatsapp.net"));
    }

    #[test]
    fn send_request_serializes_jid_and_text() {
        let body = serde_json::to_string(&SendRequest {
            jid: "2348031234567@s.whatsapp.net",
            text: "Hello",
        })
        .unwrap();
        assert!(body.contains("\"jid\":\"2348031234567@s.whatsapp.net\""));
        assert!(body.contains("\"text\":\"Hello\""));
    }

    #[test]
    fn status_response_deserializes() {
        let parsed: StatusResponse = serde_json::from_str(r#"{"connected": true}"#).unwrap();
        assert!(parsed.connected);
    }
}
