// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The 32-byte symmetric key used to encrypt/decrypt state tokens (spec §6
//! `encryption_key_file`).

use crate::error::TokenError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use crypto_secretbox::Key;
use std::path::Path;

/// A loaded, validated 32-byte encryption key.
#[derive(Clone)]
pub struct TokenKey(pub(crate) Key);

impl TokenKey {
    /// Parse a key from its base64 encoding (spec §6: "a file containing a
    /// base64 32-byte key"). Standard alphabet, padding tolerated either way.
    pub fn from_base64(encoded: &str) -> Result<Self, TokenError> {
        let trimmed = encoded.trim();
        let bytes = STANDARD
            .decode(trimmed)
            .map_err(|e| TokenError::InvalidKey(e.to_string()))?;
        if bytes.len() != 32 {
            return Err(TokenError::InvalidKey(format!(
                "expected 32 bytes, got {}",
                bytes.len()
            )));
        }
        Ok(TokenKey(Key::clone_from_slice(&bytes)))
    }

    /// Read and parse `encryption_key_file` (spec §6).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TokenError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| TokenError::InvalidKey(e.to_string()))?;
        Self::from_base64(&content)
    }

    #[cfg(any(test, feature = "test-support"))]
    pub fn generate() -> Self {
        use crypto_secretbox::aead::OsRng;
        use crypto_secretbox::KeyInit;
        TokenKey(crypto_secretbox::XSalsa20Poly1305::generate_key(&mut OsRng))
    }
}
