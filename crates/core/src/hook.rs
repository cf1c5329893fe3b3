// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Hook configuration and the dispatch seam (spec §4.8).
//!
//! `stepflow-core` only describes *what* a hook is and the contract its
//! dispatcher must honor; the concrete transports (in-process function
//! table, subprocess, HTTP) live in `stepflow-adapters` so this crate never
//! depends on `tokio`/`reqwest`/process spawning.

use crate::state::InterviewState;
use crate::step::StepOutcome;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The three hook transports spec §4.8 requires, tagged by `type` in the
/// interview YAML.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HookConfig {
    /// `module:name` reference into an in-process function table.
    Inline { function: String },
    /// Local program path; state travels as JSON on stdin.
    Executable { path: String },
    /// URL the state is POSTed to as JSON.
    Http { url: String },
}

#[derive(Debug, Error, Clone)]
pub enum HookError {
    #[error("hook {0:?} is not registered")]
    UnknownInline(String),
    #[error("hook executable failed: {0}")]
    Executable(String),
    #[error("hook executable produced invalid output: {0}")]
    InvalidOutput(String),
    #[error("hook http call failed: {0}")]
    Http(String),
    #[error("hook http call returned a non-2xx status: {0}")]
    HttpStatus(u16),
    #[error("hook was cancelled")]
    Cancelled,
}

/// All three hook kinds obey this contract: run against the current state,
/// produce an updated state plus a step outcome. The dispatcher owns no
/// concurrency of its own beyond a single await/wait per hook (spec §5).
pub trait HookDispatcher: Send + Sync {
    fn dispatch(
        &self,
        hook: &HookConfig,
        state: &InterviewState,
    ) -> Result<(InterviewState, StepOutcome), HookError>;
}

/// A dispatcher that rejects every hook. Used where a host has no hook
/// requirement (spec §9 Open Questions: Hook may be omitted by such hosts)
/// but still needs a `&dyn HookDispatcher` to drive the stepper.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHooks;

impl HookDispatcher for NoHooks {
    fn dispatch(
        &self,
        hook: &HookConfig,
        _state: &InterviewState,
    ) -> Result<(InterviewState, StepOutcome), HookError> {
        match hook {
            HookConfig::Inline { function } => {
                Err(HookError::UnknownInline(function.clone()))
            }
            HookConfig::Executable { path } => Err(HookError::Executable(format!(
                "no hook dispatcher configured for executable hook {path:?}"
            ))),
            HookConfig::Http { url } => Err(HookError::Http(format!(
                "no hook dispatcher configured for http hook {url:?}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_hooks_rejects_every_kind() {
        let state = InterviewState::new_test();
        assert!(NoHooks
            .dispatch(&HookConfig::Inline { function: "m:f".into() }, &state)
            .is_err());
        assert!(NoHooks
            .dispatch(
                &HookConfig::Executable { path: "/bin/true".into() },
                &state
            )
            .is_err());
        assert!(NoHooks
            .dispatch(
                &HookConfig::Http { url: "http://x".into() },
                &state
            )
            .is_err());
    }
}
