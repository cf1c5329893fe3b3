// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `executable` hook transport: a local program invoked with the state
//! as JSON on stdin (spec §4.8).
//!
//! `stepflow-core`'s `HookDispatcher` is a synchronous call (spec §5: "the
//! stepper is single-threaded cooperative per request"), so the deadline
//! here is enforced by polling `Child::try_wait` rather than an async
//! executor — the same contract as `oj-adapters::subprocess::run_with_timeout`
//! ("the child process is killed... if the timeout elapses"), just driven
//! by an explicit `kill()` since a synchronous `std::process::Child` has no
//! drop-on-timeout behavior to lean on the way `tokio::process::Child` does.

use crate::wire::{HookResponse, HookResultWire};
use std::io::Write;
use std::process::{Command, Output, Stdio};
use std::time::{Duration, Instant};
use stepflow_core::{HookError, InterviewState, StepOutcome};

/// How often `wait_with_timeout` polls the child for exit while waiting.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

#[derive(Debug, Clone)]
pub struct ExecutableHookRunner {
    timeout: Duration,
}

impl ExecutableHookRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Run `path`, write `state` as JSON to its stdin, and wait up to
    /// `self.timeout` for it to exit. An empty stdout means "no change"; a
    /// non-empty stdout is parsed as `{state, result}` (spec §4.8).
    #[allow(clippy::expect_used)]
    pub fn run(
        &self,
        path: &str,
        state: &InterviewState,
    ) -> Result<(InterviewState, StepOutcome), HookError> {
        let mut cmd = Command::new(path);
        self.run_command(&mut cmd, state)
    }

    fn run_command(
        &self,
        cmd: &mut Command,
        state: &InterviewState,
    ) -> Result<(InterviewState, StepOutcome), HookError> {
        let stdin_payload =
            serde_json::to_vec(state).map_err(|e| HookError::Executable(e.to_string()))?;

        let mut child = cmd
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| HookError::Executable(format!("failed to start hook: {e}")))?;

        child
            .stdin
            .take()
            .expect("piped stdin")
            .write_all(&stdin_payload)
            .map_err(|e| HookError::Executable(format!("failed to write stdin: {e}")))?;

        let output = self.wait_with_timeout(child)?;
        Self::parse_output(output, state)
    }

    /// Wait for `child` to exit, polling rather than blocking outright so
    /// the deadline can kill the process instead of merely giving up on it
    /// (spec §5: "the in-flight hook is cancelled", not abandoned).
    fn wait_with_timeout(&self, mut child: std::process::Child) -> Result<Output, HookError> {
        let deadline = Instant::now() + self.timeout;
        loop {
            match child.try_wait() {
                Ok(Some(_status)) => {
                    return child
                        .wait_with_output()
                        .map_err(|e| HookError::Executable(e.to_string()));
                }
                Ok(None) => {
                    if Instant::now() >= deadline {
                        let _ = child.kill();
                        let _ = child.wait();
                        return Err(HookError::Executable(format!(
                            "hook executable timed out after {}s",
                            self.timeout.as_secs()
                        )));
                    }
                    std::thread::sleep(POLL_INTERVAL);
                }
                Err(e) => return Err(HookError::Executable(e.to_string())),
            }
        }
    }

    fn parse_output(
        output: Output,
        state: &InterviewState,
    ) -> Result<(InterviewState, StepOutcome), HookError> {
        if !output.status.success() {
            return Err(HookError::Executable(format!(
                "exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr)
            )));
        }
        if output.stdout.iter().all(|b| b.is_ascii_whitespace()) {
            return Ok((state.clone(), StepOutcome::NotChanged));
        }
        let response: HookResponse = serde_json::from_slice(&output.stdout)
            .map_err(|e| HookError::InvalidOutput(e.to_string()))?;
        let outcome = match response.result {
            Some(HookResultWire::Exit { title, description }) => {
                StepOutcome::Exit(Box::new(stepflow_core::ExitResult {
                    kind: "exit",
                    title,
                    description,
                }))
            }
            None if response.state == *state => StepOutcome::NotChanged,
            None => StepOutcome::Changed,
        };
        Ok((response.state, outcome))
    }
}

#[cfg(test)]
impl ExecutableHookRunner {
    /// Run a shell script via `/bin/sh -c` instead of a bare executable
    /// path, so tests can exercise stdout/timeout behavior without
    /// checking in fixture binaries.
    fn run_script_for_test(
        &self,
        script: &str,
        state: &InterviewState,
    ) -> Result<(InterviewState, StepOutcome), HookError> {
        let mut cmd = Command::new("/bin/sh");
        cmd.arg("-c").arg(script);
        self.run_command(&mut cmd, state)
    }
}

#[cfg(test)]
#[path = "executable_tests.rs"]
mod tests;
