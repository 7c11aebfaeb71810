// ABOUTME: Cryptographic helpers for token value generation and secret comparison
// ABOUTME: Uses the system CSPRNG; predictable token values are a security failure
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gatehouse Project

use crate::errors::{AppError, AppResult};
use base64::{engine::general_purpose, Engine as _};
use ring::rand::{SecureRandom, SystemRandom};
use subtle::ConstantTimeEq;

/// Number of random bytes in a generated token or code value (256 bits)
const TOKEN_VALUE_BYTES: usize = 32;

/// Generate a high-entropy, URL-safe token or code value
///
/// # Errors
///
/// Returns an error if the system RNG fails; the service cannot operate
/// securely without a working RNG, so callers must propagate this.
pub fn generate_token_value() -> AppResult<String> {
    let rng = SystemRandom::new();
    let mut bytes = [0u8; TOKEN_VALUE_BYTES];

    rng.fill(&mut bytes).map_err(|_| {
        tracing::error!("SystemRandom failed - cannot generate secure token values");
        AppError::internal("System RNG failure")
    })?;

    Ok(general_purpose::URL_SAFE_NO_PAD.encode(bytes))
}

/// Compare a stored secret with a presented one in constant time
#[must_use]
pub fn secrets_match(stored: &str, presented: &str) -> bool {
    stored.as_bytes().ct_eq(presented.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_values_are_unique() {
        let first = generate_token_value().unwrap();
        let second = generate_token_value().unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_token_value_is_url_safe() {
        let value = generate_token_value().unwrap();
        // 32 bytes of base64 without padding
        assert_eq!(value.len(), 43);
        assert!(value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_secrets_match() {
        assert!(secrets_match("test_secret", "test_secret"));
        assert!(!secrets_match("test_secret", "wrong_secret"));
        assert!(!secrets_match("test_secret", ""));
    }
}
