// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Canonical serialization, authenticated encryption, and validation of
//! state tokens (spec §4.9).
//!
//! Wire format: `base64url_nopad(nonce(24) || secretbox(plaintext, nonce,
//! key))`, where `plaintext` is the canonical JSON form of
//! [`stepflow_core::InterviewState`] — an authenticated construction
//! equivalent to NaCl's SecretBox (XSalsa20-Poly1305), per spec §4.9.

use crate::error::TokenError;
use crate::key::TokenKey;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use crypto_secretbox::aead::{Aead, AeadCore, OsRng};
use crypto_secretbox::{Nonce, XSalsa20Poly1305};
use stepflow_core::InterviewState;

const NONCE_LEN: usize = 24;

/// Canonical JSON for a state: round-tripping through [`serde_json::Value`]
/// re-serializes every map as a `BTreeMap`, sorting keys (spec §4.9 "keys
/// sorted"); `answered_question_ids` is already a `BTreeSet` and
/// `expiration_date` already renders as RFC 3339 UTC via `chrono`'s serde
/// impl, so both spec requirements fall out of the existing types.
fn canonical_json(state: &InterviewState) -> Result<Vec<u8>, TokenError> {
    let value = serde_json::to_value(state).map_err(|_| TokenError::Invalid)?;
    serde_json::to_vec(&value).map_err(|_| TokenError::Invalid)
}

/// Encrypt `state` into a URL-safe base64 token.
pub fn encrypt(state: &InterviewState, key: &TokenKey) -> Result<String, TokenError> {
    let plaintext = canonical_json(state)?;
    let cipher = <XSalsa20Poly1305 as crypto_secretbox::KeyInit>::new(&key.0);
    let nonce = XSalsa20Poly1305::generate_nonce(&mut OsRng);
    let ciphertext = cipher
        .encrypt(&nonce, plaintext.as_slice())
        .map_err(|_| TokenError::Invalid)?;

    let mut wire = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    wire.extend_from_slice(&nonce);
    wire.extend_from_slice(&ciphertext);
    Ok(URL_SAFE_NO_PAD.encode(wire))
}

/// Decrypt a token into its `InterviewState`. Every failure mode — bad
/// base64, short input, failed authentication, malformed JSON — collapses
/// to the same opaque [`TokenError::Invalid`] (spec §4.9).
pub fn decrypt(token: &str, key: &TokenKey) -> Result<InterviewState, TokenError> {
    let wire = URL_SAFE_NO_PAD
        .decode(token)
        .map_err(|_| TokenError::Invalid)?;
    if wire.len() < NONCE_LEN {
        return Err(TokenError::Invalid);
    }
    let (nonce_bytes, ciphertext) = wire.split_at(NONCE_LEN);
    let nonce = Nonce::from_slice(nonce_bytes);

    let cipher = <XSalsa20Poly1305 as crypto_secretbox::KeyInit>::new(&key.0);
    let plaintext = cipher
        .decrypt(nonce, ciphertext)
        .map_err(|_| TokenError::Invalid)?;

    serde_json::from_slice(&plaintext).map_err(|_| TokenError::Invalid)
}

/// Reject an expired state, or one whose `interview_version` doesn't match
/// `current_version` when one is supplied (spec §4.9 "Validate").
pub fn validate(
    state: &InterviewState,
    now: DateTime<Utc>,
    current_version: Option<&str>,
) -> Result<(), TokenError> {
    if state.is_expired(now) {
        return Err(TokenError::Expired);
    }
    if let Some(current) = current_version {
        if state.interview_version != current {
            return Err(TokenError::VersionMismatch {
                token: state.interview_version.clone(),
                current: current.to_string(),
            });
        }
    }
    Ok(())
}
