// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The interview stepper (spec §4.7): `advance` drives an `Interview` one
//! request forward, resolving any `Undefined` location it encounters into
//! a question that can provide it (`recursive_ask`).
//!
//! The source engine relies on exception propagation through nested
//! handlers to carry an "undefined variable" signal up to the scan loop
//! (spec §9). Here that signal is an ordinary `Result` variant —
//! `StepError::Undefined` — and this module is the one place it is
//! matched and turned into an ask (spec §9, §4.6 "Critical behavior").

use indexmap::IndexMap;
use stepflow_core::condition::ConditionEvalError;
use stepflow_core::expr::ExprEvalError;
use stepflow_core::location::{self, EvalError, UndefinedError};
use stepflow_core::question::AskResultError;
use stepflow_core::state::InterviewState;
use stepflow_core::step::StepError;
use stepflow_core::template::TemplateRenderError;
use stepflow_core::value_expr::ValueExprEvalError;
use stepflow_core::{AskResult, Clock, ExitResult, HookDispatcher, Interview, Location, StepOutcome, Value};

use crate::error::StepperError;

/// What `advance` produced, mapped directly onto the HTTP host's
/// `AskResult|ExitResult|null` (spec §6).
#[derive(Debug, Clone, PartialEq)]
pub enum AdvanceOutcome {
    Ask(Box<AskResult>),
    Exit(Box<ExitResult>),
    Completed,
}

/// Advance `state` by one interaction against `interview` (spec §4.7).
///
/// `responses`/`button` answer the question named by `state.question_id`,
/// if one is pending; they are ignored (must be `None`) on a state with no
/// question outstanding. `clock` supplies "today" for field coercion (the
/// `"today"` sentinel, spec §4.3) without reaching for `Utc::now()`
/// directly, matching [`stepflow_core::clock::Clock`]'s purpose elsewhere
/// in the workspace.
pub fn advance(
    interview: &Interview,
    state: &InterviewState,
    hooks: &dyn HookDispatcher,
    responses: Option<&IndexMap<String, Value>>,
    button: Option<i64>,
    clock: &dyn Clock,
) -> Result<(InterviewState, AdvanceOutcome), StepperError> {
    if state.complete {
        return Err(StepperError::AlreadyComplete);
    }

    let today = clock.now().date_naive();
    let span = tracing::info_span!(
        "stepper.advance",
        interview_id = %interview.id,
        submission_id = %state.submission_id,
    );
    let _enter = span.enter();

    let mut current = apply_pending_response(interview, state, responses, button, today)?;

    loop {
        match scan(interview, &current, hooks)? {
            ScanResult::Restart(next) => {
                current = next;
            }
            ScanResult::Outcome(next, outcome) => {
                tracing::info!(outcome = outcome_label(&outcome), "stepper advanced");
                return Ok((next, outcome));
            }
            ScanResult::Complete => {
                let mut completed = current;
                completed.complete = true;
                tracing::info!("interview completed");
                return Ok((completed, AdvanceOutcome::Completed));
            }
        }
    }
}

fn outcome_label(outcome: &AdvanceOutcome) -> &'static str {
    match outcome {
        AdvanceOutcome::Ask(_) => "ask",
        AdvanceOutcome::Exit(_) => "exit",
        AdvanceOutcome::Completed => "completed",
    }
}

/// If `state.question_id` is set, structure `responses`/`button` through
/// that question's fields and merge the resulting assignments into
/// `data`, clearing `question_id` (spec §4.7 step 2). Validation errors
/// propagate unchanged to the caller — the stepper never retries on the
/// caller's behalf.
fn apply_pending_response(
    interview: &Interview,
    state: &InterviewState,
    responses: Option<&IndexMap<String, Value>>,
    button: Option<i64>,
    today: chrono::NaiveDate,
) -> Result<InterviewState, StepperError> {
    let Some(question_id) = state.question_id.clone() else {
        return Ok(state.clone());
    };
    let question = interview
        .bank
        .by_id(&question_id)
        .ok_or_else(|| StepperError::UnknownCurrentQuestion(question_id.clone()))?;

    let assignments = question.parse_response(responses, button, today)?;

    let mut next = state.clone();
    let mut data = next.data_value();
    for (loc, value) in assignments {
        location::assign(&loc, value, &mut data)?;
    }
    next.set_data_value(data);
    next.question_id = None;
    Ok(next)
}

enum ScanResult {
    /// A `Set` step fired; re-scan the flattened list from the top with
    /// the new state (spec §4.7 step 3: "on `changed`, restart the scan").
    Restart(InterviewState),
    Outcome(InterviewState, AdvanceOutcome),
    Complete,
}

/// One pass over `interview.flattened_steps`, from the top (spec §4.7).
fn scan(
    interview: &Interview,
    state: &InterviewState,
    hooks: &dyn HookDispatcher,
) -> Result<ScanResult, StepperError> {
    for step in &interview.flattened_steps {
        let ctx = state.template_context();

        match step.when().evaluate(&ctx) {
            Ok(false) => continue,
            Ok(true) => {}
            Err(e) => return resolve_or_propagate_condition(interview, state, hooks, e),
        }

        match step.handle(state, &interview.bank, hooks) {
            Ok((_, StepOutcome::NotChanged)) => continue,
            Ok((next, StepOutcome::Changed)) => return Ok(ScanResult::Restart(next)),
            Ok((next, StepOutcome::Ask(_question_id, ask))) => {
                return Ok(ScanResult::Outcome(next, AdvanceOutcome::Ask(ask)))
            }
            Ok((next, StepOutcome::Exit(exit))) => {
                return Ok(ScanResult::Outcome(next, AdvanceOutcome::Exit(exit)))
            }
            Err(step_err) => {
                if let Some(loc) = undefined_in_step(&step_err) {
                    let (next, outcome) = resolve_ask(interview, state, &loc)?;
                    return Ok(ScanResult::Outcome(next, outcome));
                }
                return Err(StepperError::Step(step_err));
            }
        }
    }
    Ok(ScanResult::Complete)
}

fn resolve_or_propagate_condition(
    interview: &Interview,
    state: &InterviewState,
    _hooks: &dyn HookDispatcher,
    err: ConditionEvalError,
) -> Result<ScanResult, StepperError> {
    if let Some(loc) = undefined_in_condition(&err) {
        let (next, outcome) = resolve_ask(interview, state, &loc)?;
        return Ok(ScanResult::Outcome(next, outcome));
    }
    Err(StepperError::Step(StepError::from(err)))
}

/// recursive_ask(L) (spec §4.7): find the first question providing `L`
/// that is not yet answered and whose `when` matches, build its
/// `AskResult`, and mark it asked. Building the `AskResult` may itself
/// raise `Undefined(L')` (label/description templates referencing an
/// unset variable) — in that case recurse on `L'` (spec §4.7 step 3).
fn resolve_ask(
    interview: &Interview,
    state: &InterviewState,
    loc: &Location,
) -> Result<(InterviewState, AdvanceOutcome), StepperError> {
    let ctx = state.template_context();

    let candidates = match interview.bank.providing(loc, &ctx) {
        Ok(c) => c,
        Err(e) => {
            return match eval_undefined(&e) {
                Some(loc2) => resolve_ask(interview, state, &loc2),
                None => Err(StepperError::Step(StepError::from(e))),
            }
        }
    };

    for question in candidates {
        if state.answered_question_ids.contains(&question.id) {
            continue;
        }

        match question.when.evaluate(&ctx) {
            Ok(false) => continue,
            Ok(true) => {}
            Err(e) => {
                return match undefined_in_condition(&e) {
                    Some(loc2) => resolve_ask(interview, state, &loc2),
                    None => Err(StepperError::Step(StepError::from(e))),
                }
            }
        }

        match question.ask_result(&ctx) {
            Ok(ask) => {
                let next = state.update_with_question(question.id.clone());
                tracing::info!(question_id = %question.id, location = %loc, "recursive ask resolved");
                return Ok((next, AdvanceOutcome::Ask(Box::new(ask))));
            }
            Err(e) => {
                return match undefined_in_ask_result(&e) {
                    Some(loc2) => resolve_ask(interview, state, &loc2),
                    None => Err(StepperError::Step(StepError::from(e))),
                }
            }
        }
    }

    Err(StepperError::NoQuestionForLocation(loc.clone()))
}

fn eval_undefined(e: &EvalError) -> Option<Location> {
    match e {
        EvalError::Undefined(UndefinedError(loc)) => Some(loc.clone()),
        _ => None,
    }
}

fn expr_undefined(e: &ExprEvalError) -> Option<Location> {
    match e {
        ExprEvalError::Eval(eval) => eval_undefined(eval),
        _ => None,
    }
}

fn undefined_in_condition(e: &ConditionEvalError) -> Option<Location> {
    let ConditionEvalError::Expr(expr_err) = e;
    expr_undefined(expr_err)
}

fn undefined_in_template(e: &TemplateRenderError) -> Option<Location> {
    let TemplateRenderError::Expr(expr_err) = e;
    expr_undefined(expr_err)
}

fn undefined_in_ask_result(e: &AskResultError) -> Option<Location> {
    let AskResultError::Render(render_err) = e;
    undefined_in_template(render_err)
}

fn undefined_in_value_expr(e: &ValueExprEvalError) -> Option<Location> {
    let ValueExprEvalError::Expr(expr_err) = e;
    expr_undefined(expr_err)
}

/// Extract the `Undefined(Location)` signal from a [`StepError`] if one is
/// buried in it, across every variant it can transitively wrap.
fn undefined_in_step(e: &StepError) -> Option<Location> {
    match e {
        StepError::Undefined(UndefinedError(loc)) => Some(loc.clone()),
        StepError::Eval(eval) => eval_undefined(eval),
        StepError::Assign(assign) => match assign {
            stepflow_core::location::AssignError::Eval(eval) => eval_undefined(eval),
            _ => None,
        },
        StepError::Condition(cond) => undefined_in_condition(cond),
        StepError::Render(render) => undefined_in_template(render),
        StepError::AskResult(ask) => undefined_in_ask_result(ask),
        StepError::Hook(_) => None,
        StepError::ValueExpr(value_expr) => undefined_in_value_expr(value_expr),
        StepError::UnknownQuestion(_) => None,
    }
}

#[cfg(test)]
#[path = "stepper_tests.rs"]
mod tests;
