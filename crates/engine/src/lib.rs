// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! stepflow-engine: the stepper that drives an `Interview` forward one
//! request at a time — `advance` applies a submitted response and scans
//! the flattened step list; `recursive_ask` resolves an `UndefinedError`
//! into the next question to present (spec §4.7).

pub mod error;
pub mod stepper;

pub use error::StepperError;
pub use stepper::{advance, AdvanceOutcome};
