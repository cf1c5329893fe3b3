use super::*;
use stepflow_core::InterviewState;

#[test]
fn missing_executable_is_an_error() {
    let runner = ExecutableHookRunner::new(Duration::from_secs(5));
    let state = InterviewState::new_test();
    let err = runner
        .run("/no/such/executable-stepflow-test", &state)
        .unwrap_err();
    assert!(matches!(err, HookError::Executable(_)));
}

#[test]
fn nonzero_exit_is_an_error() {
    let runner = ExecutableHookRunner::new(Duration::from_secs(5));
    let state = InterviewState::new_test();
    let err = runner
        .run_script_for_test("cat >/dev/null; exit 1", &state)
        .unwrap_err();
    assert!(matches!(err, HookError::Executable(_)));
}

#[test]
fn empty_stdout_means_not_changed() {
    let runner = ExecutableHookRunner::new(Duration::from_secs(5));
    let state = InterviewState::new_test();
    let (next, outcome) = runner.run_script_for_test("cat >/dev/null", &state).unwrap();
    assert_eq!(next, state);
    assert_eq!(outcome, StepOutcome::NotChanged);
}

#[test]
fn well_formed_envelope_with_exit_result() {
    let runner = ExecutableHookRunner::new(Duration::from_secs(5));
    let state = InterviewState::new_test();
    let script = r#"printf '{"state": %s, "result": {"type": "exit", "title": "done"}}' "$(cat)""#;
    let (next, outcome) = runner.run_script_for_test(script, &state).unwrap();
    assert_eq!(next, state);
    match outcome {
        StepOutcome::Exit(exit) => assert_eq!(exit.title, "done"),
        other => panic!("expected Exit, got {other:?}"),
    }
}

#[test]
fn timeout_is_enforced() {
    let runner = ExecutableHookRunner::new(Duration::from_millis(50));
    let state = InterviewState::new_test();
    let err = runner.run_script_for_test("sleep 2", &state).unwrap_err();
    assert!(matches!(err, HookError::Executable(msg) if msg.contains("timed out")));
}

#[test]
fn timeout_kills_the_child_instead_of_abandoning_it() {
    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("ran");
    let runner = ExecutableHookRunner::new(Duration::from_millis(50));
    let state = InterviewState::new_test();
    let script = format!("cat >/dev/null; sleep 1; touch {}", marker.display());
    let _ = runner.run_script_for_test(&script, &state);

    // If the child were merely abandoned rather than killed, it would still
    // be alive here and create the marker file once its sleep elapses.
    std::thread::sleep(Duration::from_millis(1200));
    assert!(!marker.exists());
}
