use super::*;
use std::io::{Read, Write};
use std::net::TcpListener;
use stepflow_core::InterviewState;

/// Start a single-shot HTTP/1.1 server on an ephemeral port that reads one
/// request and replies with a fixed raw response, returning its base URL.
fn serve_once(response: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    std::thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let mut buf = [0u8; 4096];
            let _ = stream.read(&mut buf);
            let _ = stream.write_all(response.as_bytes());
        }
    });
    format!("http://{addr}")
}

#[test]
fn no_content_means_not_changed() {
    let url = serve_once("HTTP/1.1 204 No Content\r\nContent-Length: 0\r\n\r\n");
    let runner = HttpHookRunner::new(Duration::from_secs(5));
    let state = InterviewState::new_test();
    let (next, outcome) = runner.run(&url, &state).unwrap();
    assert_eq!(next, state);
    assert_eq!(outcome, StepOutcome::NotChanged);
}

#[test]
fn non_2xx_is_fatal() {
    let url = serve_once("HTTP/1.1 500 Internal Server Error\r\nContent-Length: 0\r\n\r\n");
    let runner = HttpHookRunner::new(Duration::from_secs(5));
    let state = InterviewState::new_test();
    let err = runner.run(&url, &state).unwrap_err();
    assert!(matches!(err, HookError::HttpStatus(500)));
}

#[test]
fn two_hundred_with_body_parses_envelope() {
    let state = InterviewState::new_test();
    let state_json = serde_json::to_string(&state).unwrap();
    let body = format!(
        r#"{{"state": {state_json}, "result": {{"type": "exit", "title": "stopped"}}}}"#
    );
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
        body.len(),
        body
    );
    let response: &'static str = Box::leak(response.into_boxed_str());
    let url = serve_once(response);
    let runner = HttpHookRunner::new(Duration::from_secs(5));
    let (next, outcome) = runner.run(&url, &state).unwrap();
    assert_eq!(next, state);
    match outcome {
        StepOutcome::Exit(exit) => assert_eq!(exit.title, "stopped"),
        other => panic!("expected Exit, got {other:?}"),
    }
}
