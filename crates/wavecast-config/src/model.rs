// SPDX-FileCopyrightText: 2026 Wavecast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Wavecast dispatch engine.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Wavecast configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WavecastConfig {
    /// Service identity and logging settings.
    #[serde(default)]
    pub service: ServiceConfig,

    /// Campaign throttling and concurrency settings.
    #[serde(default)]
    pub campaign: CampaignConfig,

    /// Dial plan used for phone number normalization and validation.
    #[serde(default)]
    pub phone: PhoneConfig,

    /// HTTP gateway settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// WhatsApp bridge sidecar settings.
    #[serde(default)]
    pub bridge: BridgeConfig,
}

/// Service identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Display name of the service.
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_service_name() -> String {
    "wavecast".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Campaign throttling and concurrency configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CampaignConfig {
    /// Minimum accepted inter-send delay, in milliseconds. Submissions
    /// below this floor are rejected.
    #[serde(default = "default_min_delay_ms")]
    pub min_delay_ms: u64,

    /// Maximum number of campaigns dispatching concurrently. Additional
    /// campaigns queue in `pending` state until a slot frees.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
}

impl Default for CampaignConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: default_min_delay_ms(),
            max_concurrent: default_max_concurrent(),
        }
    }
}

fn default_min_delay_ms() -> u64 {
    6000
}

fn default_max_concurrent() -> usize {
    4
}

/// Dial plan configuration for phone number normalization.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PhoneConfig {
    /// Country code prepended when the trunk prefix is stripped.
    #[serde(default = "default_country_code")]
    pub country_code: String,

    /// Trunk prefix replaced by the country code during normalization.
    /// Empty disables trunk rewriting.
    #[serde(default = "default_trunk_prefix")]
    pub trunk_prefix: String,

    /// Minimum dialable length accepted at submission, in digits.
    #[serde(default = "default_min_digits")]
    pub min_digits: usize,

    /// Maximum dialable length accepted at submission, in digits.
    #[serde(default = "default_max_digits")]
    pub max_digits: usize,
}

impl Default for PhoneConfig {
    fn default() -> Self {
        Self {
            country_code: default_country_code(),
            trunk_prefix: default_trunk_prefix(),
            min_digits: default_min_digits(),
            max_digits: default_max_digits(),
        }
    }
}

fn default_country_code() -> String {
    "234".to_string()
}

fn default_trunk_prefix() -> String {
    "0".to_string()
}

fn default_min_digits() -> usize {
    10
}

fn default_max_digits() -> usize {
    15
}

/// HTTP gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Host address to bind.
    #[serde(default = "default_gateway_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_gateway_port")]
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_gateway_host(),
            port: default_gateway_port(),
        }
    }
}

fn default_gateway_host() -> String {
    "127.0.0.1".to_string()
}

fn default_gateway_port() -> u16 {
    8820
}

/// WhatsApp bridge sidecar configuration.
///
/// The bridge is the external process that owns the WhatsApp session
/// (QR pairing, socket lifecycle). Wavecast talks to it over HTTP.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BridgeConfig {
    /// Base URL of the bridge HTTP API.
    #[serde(default = "default_bridge_url")]
    pub base_url: String,

    /// Interval between connection-state polls, in seconds.
    #[serde(default = "default_status_poll_secs")]
    pub status_poll_secs: u64,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            base_url: default_bridge_url(),
            status_poll_secs: default_status_poll_secs(),
        }
    }
}

fn default_bridge_url() -> String {
    "http://127.0.0.1:3001".to_string()
}

fn default_status_poll_secs() -> u64 {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_behavior() {
        let config = WavecastConfig::default();
        assert_eq!(config.campaign.min_delay_ms, 6000);
        assert_eq!(config.phone.country_code, "234");
        assert_eq!(config.phone.trunk_prefix, "0");
        assert_eq!(config.phone.min_digits, 10);
        assert_eq!(config.phone.max_digits, 15);
    }

    #[test]
    fn sections_are_optional_in_toml() {
        let config: WavecastConfig = toml::from_str("[service]\nname = \"test\"\n").unwrap();
        assert_eq!(config.service.name, "test");
        assert_eq!(config.service.log_level, "info");
        assert_eq!(config.campaign.max_concurrent, 4);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = toml::from_str::<WavecastConfig>("[campaign]\nmin_dealy_ms = 6000\n");
        assert!(result.is_err());
    }
}
