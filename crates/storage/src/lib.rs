// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! stepflow-storage: the encrypted continuation token (spec §4.9).
//!
//! `InterviewState` never persists anywhere the core engine can see — the
//! token is the only persistence (spec §3 "Lifecycle"). This crate owns
//! canonical serialization, authenticated encryption/decryption, and the
//! expiration/version checks the stepper's host runs before calling
//! `Stepper::advance` again.

pub mod codec;
pub mod error;
pub mod key;

pub use codec::{decrypt, encrypt};
pub use error::TokenError;
pub use key::TokenKey;
