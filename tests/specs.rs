// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workspace-level integration tests: spec.md §8's "Concrete scenarios",
//! driven end to end through `stepflow-config` (YAML) -> `stepflow-engine`
//! (`advance`) -> `stepflow-storage` (token codec), rather than through
//! hand-built `Interview`/`InterviewState` values as the per-crate unit
//! tests do. Scenarios 1/2/3/5 are also covered at the stepper level in
//! `crates/engine/src/stepper_tests.rs`; scenario 4 (indexed locations) is
//! covered at the `QuestionBank` level in
//! `crates/core/src/question_bank_tests.rs`. This file's job is to prove
//! the whole stack agrees, including the HTTP-host-facing token lifecycle.

use chrono::{TimeZone, Utc};
use indexmap::IndexMap;
use stepflow_core::{FakeClock, InterviewId, InterviewState, QuestionId, SubmissionId};
use stepflow_engine::{advance, AdvanceOutcome};
use stepflow_storage::{decrypt, encrypt, TokenKey};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

fn write_config(dir: &tempfile::TempDir, yaml: &str) -> std::path::PathBuf {
    let path = dir.path().join("interviews.yaml");
    std::fs::write(&path, yaml).unwrap();
    path
}

fn clock() -> FakeClock {
    FakeClock(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap())
}

fn fresh_state(interview_id: &str, version: &str) -> InterviewState {
    InterviewState::create(
        SubmissionId::new("sub-1"),
        InterviewId::new(interview_id),
        version,
        "http://localhost/target",
        clock().now(),
        IndexMap::new(),
    )
}

// spec §8.1: two-field completion, driven through a loaded config.
#[test]
fn two_field_completion_through_loaded_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        &dir,
        r#"
interviews:
  - id: test1
    questions:
      - id: q1
        fields:
          - type: text
            set: first_name
          - type: text
            set: last_name
    steps:
      - ask: q1
"#,
    );
    let config = stepflow_config::load_config(&path).unwrap();
    let interview = config.by_id(&InterviewId::new("test1")).unwrap();

    let state = fresh_state("test1", &interview.version);
    let (state, outcome) =
        advance(interview, &state, &stepflow_core::hook::NoHooks, None, None, &clock()).unwrap();
    assert!(matches!(outcome, AdvanceOutcome::Ask(_)));
    assert_eq!(state.question_id, Some(QuestionId::new("q1")));

    let mut responses = IndexMap::new();
    responses.insert("field_0".to_string(), stepflow_core::Value::Str("fname".into()));
    responses.insert("field_1".to_string(), stepflow_core::Value::Str(" lname ".into()));
    let (state, outcome) = advance(
        interview,
        &state,
        &stepflow_core::hook::NoHooks,
        Some(&responses),
        None,
        &clock(),
    )
    .unwrap();
    assert!(matches!(outcome, AdvanceOutcome::Completed));
    assert_eq!(state.data.get("first_name"), Some(&stepflow_core::Value::Str("fname".into())));
    assert_eq!(state.data.get("last_name"), Some(&stepflow_core::Value::Str("lname".into())));
}

// spec §8.2: optional-then-exit, driven through a loaded config.
#[test]
fn optional_then_exit_through_loaded_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        &dir,
        r#"
interviews:
  - id: test2
    questions:
      - id: q1
        fields:
          - type: text
            set: text
            optional: true
    steps:
      - ask: q1
      - exit: "Required"
        when: "!text"
"#,
    );
    let config = stepflow_config::load_config(&path).unwrap();
    let interview = config.by_id(&InterviewId::new("test2")).unwrap();

    let state = fresh_state("test2", &interview.version);
    let (state, outcome) =
        advance(interview, &state, &stepflow_core::hook::NoHooks, None, None, &clock()).unwrap();
    assert!(matches!(outcome, AdvanceOutcome::Ask(_)));

    let mut blank = IndexMap::new();
    blank.insert("field_0".to_string(), stepflow_core::Value::Str(" ".into()));
    let (_, outcome) = advance(
        interview,
        &state,
        &stepflow_core::hook::NoHooks,
        Some(&blank),
        None,
        &clock(),
    )
    .unwrap();
    match outcome {
        AdvanceOutcome::Exit(exit) => assert_eq!(exit.title, "Required"),
        other => panic!("expected Exit, got {other:?}"),
    }

    let mut filled = IndexMap::new();
    filled.insert("field_0".to_string(), stepflow_core::Value::Str("test".into()));
    let (_, outcome) = advance(
        interview,
        &state,
        &stepflow_core::hook::NoHooks,
        Some(&filled),
        None,
        &clock(),
    )
    .unwrap();
    assert!(matches!(outcome, AdvanceOutcome::Completed));
}

// spec §8.3: recursive resolution cascades through undefined dependencies,
// surfacing each question in turn as its prerequisite data arrives.
#[test]
fn recursive_resolution_through_loaded_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        &dir,
        r#"
interviews:
  - id: test3
    questions:
      - id: q2
        fields:
          - type: text
            set: c
      - id: q3
        description: "uses {{c}}"
        fields:
          - type: text
            set: d
      - id: q4
        when: 'd == "y"'
        fields:
          - type: text
            set: e
    steps:
      - ask: q4
"#,
    );
    let config = stepflow_config::load_config(&path).unwrap();
    let interview = config.by_id(&InterviewId::new("test3")).unwrap();

    let mut state = fresh_state("test3", &interview.version);
    let (next, outcome) =
        advance(interview, &state, &stepflow_core::hook::NoHooks, None, None, &clock()).unwrap();
    match &outcome {
        AdvanceOutcome::Ask(_) => assert_eq!(next.question_id, Some(QuestionId::new("q2"))),
        other => panic!("expected Ask for q2, got {other:?}"),
    }
    state = next;
    state.data.insert("c".into(), stepflow_core::Value::Str("x".into()));
    state.question_id = None;

    let (next, outcome) =
        advance(interview, &state, &stepflow_core::hook::NoHooks, None, None, &clock()).unwrap();
    match &outcome {
        AdvanceOutcome::Ask(_) => assert_eq!(next.question_id, Some(QuestionId::new("q3"))),
        other => panic!("expected Ask for q3, got {other:?}"),
    }
    state = next;
    state.data.insert("d".into(), stepflow_core::Value::Str("y".into()));
    state.question_id = None;

    let (next, outcome) =
        advance(interview, &state, &stepflow_core::hook::NoHooks, None, None, &clock()).unwrap();
    match &outcome {
        AdvanceOutcome::Ask(_) => assert_eq!(next.question_id, Some(QuestionId::new("q4"))),
        other => panic!("expected Ask for q4, got {other:?}"),
    }
}

// spec §8.5: a conditional `always: true` Set overrides an earlier
// already-defined Set once its own `when` becomes true.
#[test]
fn set_skipping_through_loaded_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        &dir,
        r#"
interviews:
  - id: test5
    questions:
      - id: q_b
        fields:
          - type: text
            set: b
    steps:
      - set: a
        value: '"a"'
      - set: a
        value: '"x"'
      - eval: ["a", "b"]
      - set: a
        value: '"x"'
        always: true
        when: 'a != "x"'
"#,
    );
    let config = stepflow_config::load_config(&path).unwrap();
    let interview = config.by_id(&InterviewId::new("test5")).unwrap();

    let state = fresh_state("test5", &interview.version);
    let (state, outcome) =
        advance(interview, &state, &stepflow_core::hook::NoHooks, None, None, &clock()).unwrap();
    match &outcome {
        AdvanceOutcome::Ask(_) => assert_eq!(state.question_id, Some(QuestionId::new("q_b"))),
        other => panic!("expected Ask for b, got {other:?}"),
    }
    assert_eq!(state.data.get("a"), Some(&stepflow_core::Value::Str("a".into())));

    let mut responses = IndexMap::new();
    responses.insert("field_0".to_string(), stepflow_core::Value::Str("b".into()));
    let (state, outcome) = advance(
        interview,
        &state,
        &stepflow_core::hook::NoHooks,
        Some(&responses),
        None,
        &clock(),
    )
    .unwrap();
    assert!(matches!(outcome, AdvanceOutcome::Completed));
    assert_eq!(state.data.get("a"), Some(&stepflow_core::Value::Str("x".into())));
}

// spec §8.6: token tamper — a flipped ciphertext byte, and decryption
// under the wrong key, both collapse to the opaque invalid-state error,
// exercised against a state that actually came out of `advance` above.
#[test]
fn token_tamper_through_full_stack() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        &dir,
        r#"
interviews:
  - id: test1
    questions:
      - id: q1
        fields:
          - type: text
            set: first_name
    steps:
      - ask: q1
"#,
    );
    let config = stepflow_config::load_config(&path).unwrap();
    let interview = config.by_id(&InterviewId::new("test1")).unwrap();
    let state = fresh_state("test1", &interview.version);
    let (state, _) =
        advance(interview, &state, &stepflow_core::hook::NoHooks, None, None, &clock()).unwrap();

    let key = TokenKey::generate();
    let other_key = TokenKey::generate();
    let token = encrypt(&state, &key).unwrap();
    assert_eq!(decrypt(&token, &key).unwrap(), state);

    let mut wire = URL_SAFE_NO_PAD.decode(&token).unwrap();
    let last = wire.len() - 1;
    wire[last] ^= 0x01;
    let tampered = URL_SAFE_NO_PAD.encode(wire);
    assert!(decrypt(&tampered, &key).is_err());
    assert!(decrypt(&token, &other_key).is_err());
}

// spec §8 universal invariant: the no-cast rule holds through a loaded
// config's field validation, not just the hand-built Field used in
// crates/core's own tests.
#[test]
fn no_cast_rule_rejects_string_into_number_field() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        &dir,
        r#"
interviews:
  - id: test_numeric
    questions:
      - id: q1
        fields:
          - type: number
            set: age
    steps:
      - ask: q1
"#,
    );
    let config = stepflow_config::load_config(&path).unwrap();
    let interview = config.by_id(&InterviewId::new("test_numeric")).unwrap();
    let state = fresh_state("test_numeric", &interview.version);
    let (state, _) =
        advance(interview, &state, &stepflow_core::hook::NoHooks, None, None, &clock()).unwrap();

    let mut responses = IndexMap::new();
    responses.insert("field_0".to_string(), stepflow_core::Value::Str("not-a-number".into()));
    let err = advance(
        interview,
        &state,
        &stepflow_core::hook::NoHooks,
        Some(&responses),
        None,
        &clock(),
    )
    .unwrap_err();
    assert!(matches!(err, stepflow_engine::StepperError::Validation(_)));
}
