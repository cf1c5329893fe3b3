// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `http` hook transport: the state is POSTed as JSON to a URL (spec
//! §4.8). `204` means "no change"; a `2xx` with a body is parsed as
//! `{state, result}`; anything else is a fatal step error.

use crate::wire::{HookResponse, HookResultWire};
use reqwest::blocking::Client;
use std::time::Duration;
use stepflow_core::{HookError, InterviewState, StepOutcome};

#[derive(Clone)]
pub struct HttpHookRunner {
    client: Client,
}

impl HttpHookRunner {
    #[allow(clippy::expect_used)]
    pub fn new(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("reqwest client configuration is valid");
        Self { client }
    }

    pub fn run(
        &self,
        url: &str,
        state: &InterviewState,
    ) -> Result<(InterviewState, StepOutcome), HookError> {
        let response = self
            .client
            .post(url)
            .json(state)
            .send()
            .map_err(|e| HookError::Http(e.to_string()))?;

        let status = response.status();
        if status.as_u16() == 204 {
            return Ok((state.clone(), StepOutcome::NotChanged));
        }
        if !status.is_success() {
            return Err(HookError::HttpStatus(status.as_u16()));
        }

        let body: HookResponse = response
            .json()
            .map_err(|e| HookError::Http(format!("invalid response body: {e}")))?;
        let outcome = match body.result {
            Some(HookResultWire::Exit { title, description }) => {
                StepOutcome::Exit(Box::new(stepflow_core::ExitResult {
                    kind: "exit",
                    title,
                    description,
                }))
            }
            None if body.state == *state => StepOutcome::NotChanged,
            None => StepOutcome::Changed,
        };
        Ok((body.state, outcome))
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
