// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The JSON envelope executable and HTTP hooks exchange with the dispatcher
//! (spec §4.8: "stdout... is parsed as `{state, result}`"; "2xx with body
//! -> parse as `{state, result}`").
//!
//! An external hook transport has no access to the `QuestionBank`, so it
//! cannot produce an `Ask` outcome — only a state update (implicitly
//! "changed" or "not changed", inferred by comparing states) or an `Exit`.
//! This is a deliberate narrowing of `StepOutcome` for the two out-of-process
//! transports, recorded in DESIGN.md.

use serde::Deserialize;
use stepflow_core::InterviewState;

#[derive(Debug, Deserialize)]
pub struct HookResponse {
    pub state: InterviewState,
    #[serde(default)]
    pub result: Option<HookResultWire>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HookResultWire {
    Exit {
        title: String,
        #[serde(default)]
        description: Option<String>,
    },
}
