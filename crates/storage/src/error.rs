// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Token error taxonomy (spec §7 "InvalidState").
//!
//! Per spec §4.9, decryption failure and payload-parse failure are
//! deliberately folded into one opaque variant — a caller (and, through it,
//! an attacker) must not be able to tell "bad ciphertext" from "bad JSON"
//! apart. Expiration and version mismatch are distinguished only because
//! `validate` is a separate, later operation on an already-decrypted state;
//! the host still maps all three to the same 409 response (spec §6, §7).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenError {
    /// Token could not be decoded, decrypted, or parsed. Deliberately
    /// uninformative: see module docs.
    #[error("state token is invalid")]
    Invalid,
    #[error("state token expired")]
    Expired,
    #[error("state token is for interview version {token}, current version is {current}")]
    VersionMismatch { token: String, current: String },
    /// The key file did not contain a well-formed 32-byte key.
    #[error("invalid encryption key: {0}")]
    InvalidKey(String),
}
