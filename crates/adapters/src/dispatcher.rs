// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! [`CompositeDispatcher`]: routes a `HookConfig` to the matching backend
//! and wraps every dispatch in a tracing span recording kind, duration, and
//! outcome — the same texture as `oj-adapters::traced::TracedSession`.

use crate::executable::ExecutableHookRunner;
use crate::http::HttpHookRunner;
use crate::inline::InlineRegistry;
use std::time::Duration;
use stepflow_core::{HookConfig, HookDispatcher, HookError, InterviewState, StepOutcome};

/// Per-transport deadlines (spec §5: "cancellable via a request-scoped
/// deadline"). Both out-of-process transports get one; inline hooks run
/// in-process and have no deadline of their own to enforce.
#[derive(Debug, Clone, Copy)]
pub struct HookTimeouts {
    pub executable: Duration,
    pub http: Duration,
}

impl Default for HookTimeouts {
    fn default() -> Self {
        HookTimeouts {
            executable: Duration::from_secs(30),
            http: Duration::from_secs(30),
        }
    }
}

pub struct CompositeDispatcher {
    inline: InlineRegistry,
    executable: ExecutableHookRunner,
    http: HttpHookRunner,
}

impl CompositeDispatcher {
    pub fn new(inline: InlineRegistry, timeouts: HookTimeouts) -> Self {
        CompositeDispatcher {
            inline,
            executable: ExecutableHookRunner::new(timeouts.executable),
            http: HttpHookRunner::new(timeouts.http),
        }
    }
}

impl HookDispatcher for CompositeDispatcher {
    fn dispatch(
        &self,
        hook: &HookConfig,
        state: &InterviewState,
    ) -> Result<(InterviewState, StepOutcome), HookError> {
        let kind = match hook {
            HookConfig::Inline { .. } => "inline",
            HookConfig::Executable { .. } => "executable",
            HookConfig::Http { .. } => "http",
        };
        let span = tracing::info_span!("hook.dispatch", kind);
        let _enter = span.enter();
        let start = std::time::Instant::now();

        let result = match hook {
            HookConfig::Inline { function } => self.inline.call(function, state),
            HookConfig::Executable { path } => self.executable.run(path, state),
            HookConfig::Http { url } => self.http.run(url, state),
        };

        let elapsed_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(_) => tracing::info!(elapsed_ms, "hook dispatched"),
            Err(e) => tracing::warn!(elapsed_ms, error = %e, "hook failed"),
        }
        result
    }
}
