// SPDX-FileCopyrightText: 2026 Wavecast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as digit-only dial plan values and sane length bounds.

use crate::diagnostic::ConfigError;
use crate::model::WavecastConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &WavecastConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.campaign.min_delay_ms == 0 {
        errors.push(ConfigError::Validation {
            message: "campaign.min_delay_ms must be at least 1".to_string(),
        });
    }

    if config.campaign.max_concurrent == 0 {
        errors.push(ConfigError::Validation {
            message: "campaign.max_concurrent must be at least 1".to_string(),
        });
    }

    if config.phone.country_code.is_empty()
        || !config.phone.country_code.chars().all(|c| c.is_ascii_digit())
    {
        errors.push(ConfigError::Validation {
            message: format!(
                "phone.country_code must be non-empty digits, got `{}`",
                config.phone.country_code
            ),
        });
    }

    // Trunk prefix may be empty (disables rewriting) but never non-digit.
    if !config.phone.trunk_prefix.chars().all(|c| c.is_ascii_digit()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "phone.trunk_prefix must contain only digits, got `{}`",
                config.phone.trunk_prefix
            ),
        });
    }

    if config.phone.min_digits == 0 {
        errors.push(ConfigError::Validation {
            message: "phone.min_digits must be at least 1".to_string(),
        });
    }

    if config.phone.min_digits > config.phone.max_digits {
        errors.push(ConfigError::Validation {
            message: format!(
                "phone.min_digits ({}) must not exceed phone.max_digits ({})",
                config.phone.min_digits, config.phone.max_digits
            ),
        });
    }

    let host = config.gateway.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "gateway.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("gateway.host `{host}` is not a valid IP address or hostname"),
            });
        }
    }

    if !config.bridge.base_url.starts_with("http://")
        && !config.bridge.base_url.starts_with("https://")
    {
        errors.push(ConfigError::Validation {
            message: format!(
                "bridge.base_url must start with http:// or https://, got `{}`",
                config.bridge.base_url
            ),
        });
    }

    if config.bridge.status_poll_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "bridge.status_poll_secs must be at least 1".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = WavecastConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn zero_delay_floor_fails_validation() {
        let mut config = WavecastConfig::default();
        config.campaign.min_delay_ms = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("min_delay_ms"))));
    }

    #[test]
    fn non_digit_country_code_fails_validation() {
        let mut config = WavecastConfig::default();
        config.phone.country_code = "+234".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("country_code"))));
    }

    #[test]
    fn empty_trunk_prefix_is_allowed() {
        let mut config = WavecastConfig::default();
        config.phone.trunk_prefix = String::new();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn inverted_digit_bounds_fail_validation() {
        let mut config = WavecastConfig::default();
        config.phone.min_digits = 16;
        config.phone.max_digits = 15;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("min_digits"))));
    }

    #[test]
    fn bad_bridge_url_fails_validation() {
        let mut config = WavecastConfig::default();
        config.bridge.base_url = "localhost:3001".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("base_url"))));
    }

    #[test]
    fn collects_multiple_errors_without_failing_fast() {
        let mut config = WavecastConfig::default();
        config.campaign.min_delay_ms = 0;
        config.campaign.max_concurrent = 0;
        config.gateway.host = String::new();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.len() >= 3, "expected 3+ errors, got {}", errors.len());
    }
}
