// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The step sum type and block flattening (spec §3, §4.6).
//!
//! `Step::handle` is the one place an `UndefinedError` is allowed to
//! surface unhandled from a step body — it is the stepper's signal to
//! insert an ask (spec §4.6 "Critical behavior"). Everything else a step
//! can fail with is folded into [`StepError`] and returned as an ordinary
//! `Result`, never a panic (spec §9: no exception-propagation control
//! flow across module boundaries).

use crate::condition::{Condition, ConditionEvalError};
use crate::hook::{HookConfig, HookDispatcher, HookError};
use crate::id::QuestionId;
use crate::location::{self, AssignError, EvalError, Location, UndefinedError};
use crate::question::{AskResult, AskResultError};
use crate::question_bank::QuestionBank;
use crate::template::{Template, TemplateRenderError};
use crate::value_expr::{ValueExpr, ValueExprEvalError, ValueExprList};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A rendered exit message (spec §3 `Exit`).
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ExitResult {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// What handling a single step produced.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    NotChanged,
    Changed,
    Ask(QuestionId, Box<AskResult>),
    Exit(Box<ExitResult>),
}

#[derive(Debug, Error, Clone)]
pub enum StepError {
    #[error(transparent)]
    Undefined(#[from] UndefinedError),
    #[error(transparent)]
    Eval(#[from] EvalError),
    #[error(transparent)]
    Assign(#[from] AssignError),
    #[error(transparent)]
    Condition(#[from] ConditionEvalError),
    #[error(transparent)]
    Render(#[from] TemplateRenderError),
    #[error(transparent)]
    AskResult(#[from] AskResultError),
    #[error(transparent)]
    Hook(#[from] HookError),
    #[error(transparent)]
    ValueExpr(#[from] ValueExprEvalError),
    #[error("ask step references unknown question id {0}")]
    UnknownQuestion(QuestionId),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Set {
    pub set: Location,
    pub value: ValueExpr,
    #[serde(default)]
    pub always: bool,
    #[serde(default = "Condition::always")]
    pub when: Condition,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ask {
    pub ask: QuestionId,
    #[serde(default = "Condition::always")]
    pub when: Condition,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Exit {
    pub exit: Template,
    #[serde(default)]
    pub description: Option<Template>,
    #[serde(default = "Condition::always")]
    pub when: Condition,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Eval {
    pub eval: ValueExprList,
    #[serde(default = "Condition::always")]
    pub when: Condition,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Hook {
    pub hook: HookConfig,
    #[serde(default = "Condition::always")]
    pub when: Condition,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Block {
    pub block: Vec<StepOrBlock>,
    #[serde(default = "Condition::always")]
    pub when: Condition,
}

/// The sum type spec §3 describes: `{Set, Ask, Exit, Eval, Hook, Block}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum StepOrBlock {
    Set(Set),
    Ask(Ask),
    Exit(Exit),
    Eval(Eval),
    Hook(Hook),
    Block(Block),
}

/// A non-`Block` step, as it appears in `Interview::flattened_steps`.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Set(Set),
    Ask(Ask),
    Exit(Exit),
    Eval(Eval),
    Hook(Hook),
}

impl Step {
    pub fn when(&self) -> &Condition {
        match self {
            Step::Set(s) => &s.when,
            Step::Ask(s) => &s.when,
            Step::Exit(s) => &s.when,
            Step::Eval(s) => &s.when,
            Step::Hook(s) => &s.when,
        }
    }

    fn with_when(self, when: Condition) -> Step {
        match self {
            Step::Set(mut s) => {
                s.when = when;
                Step::Set(s)
            }
            Step::Ask(mut s) => {
                s.when = when;
                Step::Ask(s)
            }
            Step::Exit(mut s) => {
                s.when = when;
                Step::Exit(s)
            }
            Step::Eval(mut s) => {
                s.when = when;
                Step::Eval(s)
            }
            Step::Hook(mut s) => {
                s.when = when;
                Step::Hook(s)
            }
        }
    }

    /// Handle this step against `state`, consulting `bank` to resolve `Ask`
    /// targets and `hooks` to run `Hook` steps.
    ///
    /// Callers are responsible for evaluating `when()` first (spec §4.7
    /// step 3: "evaluate `when`; if false, skip"); `handle` itself does not
    /// re-check it.
    pub fn handle(
        &self,
        state: &crate::state::InterviewState,
        bank: &QuestionBank,
        hooks: &dyn HookDispatcher,
    ) -> Result<(crate::state::InterviewState, StepOutcome), StepError> {
        match self {
            Step::Set(step) => handle_set(step, state),
            Step::Ask(step) => handle_ask(step, state, bank),
            Step::Exit(step) => handle_exit(step, state),
            Step::Eval(step) => handle_eval(step, state),
            Step::Hook(step) => handle_hook(step, state, hooks),
        }
    }
}

fn handle_set(
    step: &Set,
    state: &crate::state::InterviewState,
) -> Result<(crate::state::InterviewState, StepOutcome), StepError> {
    let ctx = state.template_context();
    let already_defined = location::evaluate(&step.set, &ctx).is_ok();
    if already_defined && !step.always {
        return Ok((state.clone(), StepOutcome::NotChanged));
    }

    let value = step.value.evaluate(&ctx)?;
    let mut next = state.clone();
    let mut data = next.data_value();
    location::assign(&step.set, value, &mut data)?;
    next.set_data_value(data);
    Ok((next, StepOutcome::Changed))
}

fn handle_ask(
    step: &Ask,
    state: &crate::state::InterviewState,
    bank: &QuestionBank,
) -> Result<(crate::state::InterviewState, StepOutcome), StepError> {
    if state.answered_question_ids.contains(&step.ask) {
        return Ok((state.clone(), StepOutcome::NotChanged));
    }
    let question = bank
        .by_id(&step.ask)
        .ok_or_else(|| StepError::UnknownQuestion(step.ask.clone()))?;
    let ctx = state.template_context();
    let ask_result = question.ask_result(&ctx)?;
    let next = state.update_with_question(step.ask.clone());
    Ok((
        next,
        StepOutcome::Ask(step.ask.clone(), Box::new(ask_result)),
    ))
}

fn handle_exit(
    step: &Exit,
    state: &crate::state::InterviewState,
) -> Result<(crate::state::InterviewState, StepOutcome), StepError> {
    let ctx = state.template_context();
    let title = step.exit.render(&ctx)?;
    let description = step.description.as_ref().map(|t| t.render(&ctx)).transpose()?;
    Ok((
        state.clone(),
        StepOutcome::Exit(Box::new(ExitResult {
            kind: "exit",
            title,
            description,
        })),
    ))
}

fn handle_eval(
    step: &Eval,
    state: &crate::state::InterviewState,
) -> Result<(crate::state::InterviewState, StepOutcome), StepError> {
    let ctx = state.template_context();
    for item in step.eval.items() {
        item.evaluate(&ctx)?;
    }
    Ok((state.clone(), StepOutcome::NotChanged))
}

fn handle_hook(
    step: &Hook,
    state: &crate::state::InterviewState,
    hooks: &dyn HookDispatcher,
) -> Result<(crate::state::InterviewState, StepOutcome), StepError> {
    let (next, outcome) = hooks.dispatch(&step.hook, state)?;
    Ok((next, outcome))
}

/// Flatten a tree of `Step`/`Block` into the step list the stepper scans,
/// combining each emitted step's `when` with the conjunction of its
/// enclosing blocks' `when` (spec §4.6).
pub fn flatten_steps(steps: &[StepOrBlock]) -> Vec<Step> {
    flatten_with(steps, Condition::always())
}

fn flatten_with(steps: &[StepOrBlock], outer: Condition) -> Vec<Step> {
    let mut out = Vec::new();
    for item in steps {
        match item {
            StepOrBlock::Block(block) => {
                let combined = outer.clone().and(block.when.clone());
                out.extend(flatten_with(&block.block, combined));
            }
            other => {
                let (step, when) = split(other.clone());
                out.push(step.with_when(outer.clone().and(when)));
            }
        }
    }
    out
}

fn split(item: StepOrBlock) -> (Step, Condition) {
    match item {
        StepOrBlock::Set(s) => {
            let when = s.when.clone();
            (Step::Set(s), when)
        }
        StepOrBlock::Ask(s) => {
            let when = s.when.clone();
            (Step::Ask(s), when)
        }
        StepOrBlock::Exit(s) => {
            let when = s.when.clone();
            (Step::Exit(s), when)
        }
        StepOrBlock::Eval(s) => {
            let when = s.when.clone();
            (Step::Eval(s), when)
        }
        StepOrBlock::Hook(s) => {
            let when = s.when.clone();
            (Step::Hook(s), when)
        }
        StepOrBlock::Block(_) => unreachable!("Block handled by caller"),
    }
}

#[cfg(test)]
#[path = "step_tests.rs"]
mod tests;
