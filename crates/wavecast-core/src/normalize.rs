// SPDX-FileCopyrightText: 2026 Wavecast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Phone number normalization into dialable, digits-only form.
//!
//! Normalization is pure and infallible: strip every non-digit character,
//! then replace a leading trunk prefix with the configured country code.
//! Length validation (10-15 dialable digits) is the submitter's job, not
//! the normalizer's.

/// Canonicalizes raw phone number input against a configured dial plan.
#[derive(Debug, Clone)]
pub struct PhoneNormalizer {
    country_code: String,
    trunk_prefix: String,
}

impl PhoneNormalizer {
    pub fn new(country_code: impl Into<String>, trunk_prefix: impl Into<String>) -> Self {
        Self {
            country_code: country_code.into(),
            trunk_prefix: trunk_prefix.into(),
        }
    }

    /// The configured country code (digits, no `+`).
    pub fn country_code(&self) -> &str {
        &self.country_code
    }

    /// Canonicalize `raw` into a dialable number string.
    ///
    /// Returns an empty string when the input contains no digits. Inputs
    /// already carrying the country code pass through unchanged, which
    /// makes normalization idempotent.
    pub fn normalize(&self, raw: &str) -> String {
        let digits: String = raw.chars().filter(char::is_ascii_digit).collect();

        if !self.trunk_prefix.is_empty()
            && let Some(rest) = digits.strip_prefix(self.trunk_prefix.as_str())
        {
            return format!("{}{rest}", self.country_code);
        }

        digits
    }
}

impl Default for PhoneNormalizer {
    fn default() -> Self {
        Self::new("234", "0")
    }
}
