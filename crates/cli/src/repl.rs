// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The interactive dev loop: drive one [`stepflow_core::Interview`] from a
//! terminal by repeatedly calling [`stepflow_engine::advance`] and prompting
//! stdin for whatever it asks for next.

use crate::color;
use crate::error::CliError;
use indexmap::IndexMap;
use std::io::Write;
use stepflow_adapters::{CompositeDispatcher, HookTimeouts, InlineRegistry};
use stepflow_core::id::{IdGen, UuidIdGen};
use stepflow_core::{AskResult, Clock, ExitResult, Interview, InterviewState, SubmissionId, SystemClock, Value};
use stepflow_engine::{advance, AdvanceOutcome, StepperError};

/// Run `interview` end to end against stdin/stdout, starting from a fresh
/// [`InterviewState`]. Returns the terminal state once the interview exits
/// or completes.
pub fn run(interview: &Interview) -> Result<InterviewState, CliError> {
    let clock = SystemClock;
    let dispatcher = CompositeDispatcher::new(InlineRegistry::new(), HookTimeouts::default());
    let submission_id = SubmissionId::new(UuidIdGen.next());
    let mut state = InterviewState::create(
        submission_id,
        interview.id.clone(),
        interview.version.clone(),
        "stepflow-cli:stdin",
        clock.now(),
        IndexMap::new(),
    );
    let mut pending_responses: Option<IndexMap<String, Value>> = None;
    let mut pending_button: Option<i64> = None;

    loop {
        let outcome = match advance(
            interview,
            &state,
            &dispatcher,
            pending_responses.as_ref(),
            pending_button,
            &clock,
        ) {
            Ok((next, outcome)) => {
                state = next;
                outcome
            }
            Err(StepperError::Validation(e)) => {
                println!("{}", color::muted(&format!("invalid response: {e}")));
                pending_responses = None;
                pending_button = None;
                continue;
            }
            Err(e) => return Err(CliError::Stepper(e)),
        };

        match outcome {
            AdvanceOutcome::Ask(ask) => {
                let (responses, button) = prompt_ask(&ask)?;
                pending_responses = Some(responses);
                pending_button = button;
            }
            AdvanceOutcome::Exit(exit) => {
                print_exit(&exit);
                return Ok(state);
            }
            AdvanceOutcome::Completed => {
                println!("{}", color::header("Interview complete."));
                println!("{}", serde_json::to_string_pretty(&state.data).unwrap_or_default());
                return Ok(state);
            }
        }
    }
}

fn print_exit(exit: &ExitResult) {
    println!("{}", color::header(&exit.title));
    if let Some(description) = &exit.description {
        println!("{}", color::context(description));
    }
}

/// Render one [`AskResult`] and collect field responses (plus a button
/// choice, if any) from stdin.
fn prompt_ask(ask: &AskResult) -> Result<(IndexMap<String, Value>, Option<i64>), CliError> {
    if let Some(title) = &ask.title {
        println!("{}", color::header(title));
    }
    if let Some(description) = &ask.description {
        println!("{}", color::context(description));
    }

    let mut responses = IndexMap::new();
    for (slot, field) in &ask.fields {
        let value = prompt_field(slot, field)?;
        responses.insert(slot.clone(), value);
    }

    let button = match &ask.buttons {
        Some(buttons) => Some(prompt_buttons(buttons)?),
        None => None,
    };

    Ok((responses, button))
}

fn prompt_field(slot: &str, field: &stepflow_core::AskField) -> Result<Value, CliError> {
    let label = field.label.as_deref().unwrap_or(slot);
    loop {
        let hint = match field.optional {
            true => " (optional)",
            false => "",
        };
        print!(
            "{} [{}]{}: ",
            color::context(label),
            color::muted(field.kind),
            color::muted(hint)
        );
        std::io::stdout().flush()?;
        let line = read_line()?;

        match parse_field_input(field.kind, &line) {
            Ok(value) => return Ok(value),
            Err(msg) => println!("{}", color::muted(&msg)),
        }
    }
}

fn prompt_buttons(buttons: &[stepflow_core::RenderedButton]) -> Result<i64, CliError> {
    loop {
        for (i, button) in buttons.iter().enumerate() {
            let marker = if button.default { " (default)" } else { "" };
            println!("  {}) {}{}", i, button.label, color::muted(marker));
        }
        print!("choose: ");
        std::io::stdout().flush()?;
        let line = read_line()?;
        if line.is_empty() {
            if let Some(i) = buttons.iter().position(|b| b.default) {
                return Ok(i as i64);
            }
        }
        if let Ok(i) = line.parse::<i64>() {
            if usize::try_from(i).is_ok_and(|p| p < buttons.len()) {
                return Ok(i);
            }
        }
        println!("{}", color::muted("enter one of the listed numbers"));
    }
}

fn read_line() -> Result<String, CliError> {
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Parse one line of raw stdin input into the `Value` shape
/// `Field::coerce_and_validate` expects for `kind` (spec §4.3's coercion
/// table) — this is pre-coercion staging, not validation; the stepper still
/// runs the authoritative check.
#[allow(clippy::expect_used)]
fn parse_field_input(kind: &'static str, line: &str) -> Result<Value, String> {
    let trimmed = line.trim();
    match kind {
        "bool" => {
            if trimmed.is_empty() {
                return Ok(Value::Null);
            }
            match trimmed.to_ascii_lowercase().as_str() {
                "y" | "yes" | "true" | "1" => Ok(Value::Bool(true)),
                "n" | "no" | "false" | "0" => Ok(Value::Bool(false)),
                _ => Err("enter yes/no".to_string()),
            }
        }
        "number" => {
            if trimmed.is_empty() {
                return Ok(Value::Null);
            }
            if let Ok(i) = trimmed.parse::<i64>() {
                return Ok(Value::Int(i));
            }
            trimmed
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| "enter a number".to_string())
        }
        "select" => {
            if trimmed.is_empty() {
                return Ok(Value::Null);
            }
            let indices: Result<Vec<Value>, _> = trimmed
                .split(',')
                .map(|part| part.trim().parse::<i64>().map(Value::Int))
                .collect();
            match indices {
                Ok(mut values) if values.len() == 1 => Ok(values.pop().expect("len checked")),
                Ok(values) => Ok(Value::List(values)),
                Err(_) => Err("enter one or more option numbers, comma-separated".to_string()),
            }
        }
        // date/email/text all accept a raw (possibly empty) string; their
        // coercion handles trimming, the "today" sentinel, and emptiness.
        _ => Ok(Value::Str(line.to_string())),
    }
}
