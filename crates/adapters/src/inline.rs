// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `inline` hook transport: a named in-process function reference
//! (`module:name`) looked up in a caller-populated registry (spec §4.8).

use std::collections::HashMap;
use std::sync::Arc;
use stepflow_core::{HookError, InterviewState, StepOutcome};

/// An in-process hook implementation. Takes the current state, returns an
/// updated state plus a step outcome — the same contract every hook
/// transport honors (spec §4.8).
pub type InlineFn =
    Arc<dyn Fn(&InterviewState) -> Result<(InterviewState, StepOutcome), HookError> + Send + Sync>;

/// A table of `module:name` -> function, populated by the host at startup.
/// There is no ambient global registry (spec §9 "no process-global mutable
/// state") — the host builds one and hands it to
/// [`crate::CompositeDispatcher`].
#[derive(Clone, Default)]
pub struct InlineRegistry {
    functions: HashMap<String, InlineFn>,
}

impl InlineRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, f: InlineFn) -> &mut Self {
        self.functions.insert(name.into(), f);
        self
    }

    pub fn call(
        &self,
        name: &str,
        state: &InterviewState,
    ) -> Result<(InterviewState, StepOutcome), HookError> {
        let f = self
            .functions
            .get(name)
            .ok_or_else(|| HookError::UnknownInline(name.to_string()))?;
        f(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unregistered_function_is_unknown_inline() {
        let registry = InlineRegistry::new();
        let state = InterviewState::new_test();
        let err = registry.call("missing:fn", &state).unwrap_err();
        assert!(matches!(err, HookError::UnknownInline(name) if name == "missing:fn"));
    }

    #[test]
    fn registered_function_is_called() {
        let mut registry = InlineRegistry::new();
        registry.register(
            "m:noop",
            Arc::new(|s: &InterviewState| Ok((s.clone(), StepOutcome::NotChanged))),
        );
        let state = InterviewState::new_test();
        let (next, outcome) = registry.call("m:noop", &state).unwrap();
        assert_eq!(next, state);
        assert_eq!(outcome, StepOutcome::NotChanged);
    }
}
