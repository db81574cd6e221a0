use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::classifier::{Classifier, CredentialField};
use crate::probe::{self, Reachability};
use crate::progress::StatusLine;
use crate::runner::{
    run_attempts, Options, RunResult, Runner, RunnerError, Submit, WordlistSource,
};

const INVALID_USERNAME_BODY: &str = concat!(
    r#"<html><body><div id="login_error"><strong>Error:</strong> Invalid username. "#,
    r#"<a href="/wp-login.php?action=lostpassword">Lost your password?</a></div></body></html>"#,
);

const BLOCKED_BODY: &str = concat!(
    r#"<html><body><div id="login_error"><strong>Error:</strong> Cookies are blocked "#,
    r#"or not supported by your browser.</div></body></html>"#,
);

const UNRECOGNIZED_BODY: &str =
    r#"<html><body><div id="login_error">Too many failed attempts.</div></body></html>"#;

const SUCCESS_BODY: &str = "<html><body>Dashboard</body></html>";

/// Stands in for the network: hands out pre-scripted response bodies and
/// records every candidate it was asked to submit.
struct ScriptedSubmitter {
    responses: Mutex<Vec<Result<String, RunnerError>>>,
    calls: AtomicUsize,
    submitted: Mutex<Vec<String>>,
}

impl ScriptedSubmitter {
    fn new(responses: Vec<Result<String, RunnerError>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            calls: AtomicUsize::new(0),
            submitted: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn submitted(&self) -> Vec<String> {
        self.submitted.lock().unwrap().clone()
    }
}

impl Submit for ScriptedSubmitter {
    async fn submit(&self, candidate: &str) -> Result<String, RunnerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.submitted.lock().unwrap().push(candidate.to_string());
        let mut responses = self.responses.lock().unwrap();
        assert!(
            !responses.is_empty(),
            "submission issued after the scripted responses ran out"
        );
        responses.remove(0)
    }
}

fn candidates(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

fn ok(body: &str) -> Result<String, RunnerError> {
    Ok(body.to_string())
}

#[tokio::test]
async fn scenario_a_third_candidate_succeeds_in_order() {
    let submitter = ScriptedSubmitter::new(vec![
        ok(INVALID_USERNAME_BODY),
        ok(INVALID_USERNAME_BODY),
        ok(SUCCESS_BODY),
    ]);
    let classifier = Classifier::new(CredentialField::Username);
    let mut status = StatusLine::hidden();

    let result = run_attempts(
        &submitter,
        &candidates(&["admin", "root", "test"]),
        &classifier,
        &mut status,
    )
    .await
    .unwrap();

    assert_eq!(result, RunResult::Found("test".to_string()));
    assert_eq!(submitter.calls(), 3);
    assert_eq!(submitter.submitted(), candidates(&["admin", "root", "test"]));
}

#[tokio::test]
async fn scenario_b_blocked_on_first_attempt_stops_the_run() {
    let submitter = ScriptedSubmitter::new(vec![ok(BLOCKED_BODY)]);
    let classifier = Classifier::new(CredentialField::Username);
    let mut status = StatusLine::hidden();

    let result = run_attempts(&submitter, &candidates(&["a", "b"]), &classifier, &mut status)
        .await
        .unwrap();

    assert_eq!(result, RunResult::Exhausted { blocked: true });
    assert_eq!(submitter.calls(), 1);
}

#[tokio::test]
async fn empty_wordlist_exhausts_without_submissions() {
    let submitter = ScriptedSubmitter::new(Vec::new());
    let classifier = Classifier::new(CredentialField::Username);
    let mut status = StatusLine::hidden();

    let result = run_attempts(&submitter, &[], &classifier, &mut status)
        .await
        .unwrap();

    assert_eq!(result, RunResult::Exhausted { blocked: false });
    assert_eq!(submitter.calls(), 0);
}

#[tokio::test]
async fn no_submission_is_issued_after_a_success() {
    // only one scripted response: a second submission would trip the assert
    let submitter = ScriptedSubmitter::new(vec![ok(SUCCESS_BODY)]);
    let classifier = Classifier::new(CredentialField::Username);
    let mut status = StatusLine::hidden();

    let result = run_attempts(
        &submitter,
        &candidates(&["first", "second", "third"]),
        &classifier,
        &mut status,
    )
    .await
    .unwrap();

    assert_eq!(result, RunResult::Found("first".to_string()));
    assert_eq!(submitter.calls(), 1);
}

#[tokio::test]
async fn transport_failure_aborts_the_run_without_retry() {
    let submitter = ScriptedSubmitter::new(vec![
        ok(INVALID_USERNAME_BODY),
        Err(RunnerError::AttemptFailed {
            candidate: "root".to_string(),
            reason: "failed to connect".to_string(),
        }),
    ]);
    let classifier = Classifier::new(CredentialField::Username);
    let mut status = StatusLine::hidden();

    let result = run_attempts(
        &submitter,
        &candidates(&["admin", "root", "test"]),
        &classifier,
        &mut status,
    )
    .await;

    assert!(matches!(
        result,
        Err(RunnerError::AttemptFailed { ref candidate, .. }) if candidate == "root"
    ));
    assert_eq!(submitter.calls(), 2);
}

#[tokio::test]
async fn unrecognized_indicator_is_treated_as_invalid_credential() {
    let submitter = ScriptedSubmitter::new(vec![ok(UNRECOGNIZED_BODY), ok(SUCCESS_BODY)]);
    let classifier = Classifier::new(CredentialField::Username);
    let mut status = StatusLine::hidden();

    let result = run_attempts(&submitter, &candidates(&["a", "b"]), &classifier, &mut status)
        .await
        .unwrap();

    assert_eq!(result, RunResult::Found("b".to_string()));
    assert_eq!(submitter.calls(), 2);
}

#[tokio::test]
async fn blank_candidates_are_submitted_not_skipped() {
    let submitter = ScriptedSubmitter::new(vec![ok(INVALID_USERNAME_BODY), ok(SUCCESS_BODY)]);
    let classifier = Classifier::new(CredentialField::Username);
    let mut status = StatusLine::hidden();

    let result = run_attempts(&submitter, &candidates(&["", "admin"]), &classifier, &mut status)
        .await
        .unwrap();

    assert_eq!(result, RunResult::Found("admin".to_string()));
    assert_eq!(submitter.submitted(), candidates(&["", "admin"]));
}

fn serve_once(status_line: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    std::thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let mut buf = [0u8; 1024];
            let _ = stream.read(&mut buf);
            let response = format!("{status_line}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n");
            let _ = stream.write_all(response.as_bytes());
        }
    });
    format!("http://{addr}")
}

fn serve_hang() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    std::thread::spawn(move || {
        if let Ok((stream, _)) = listener.accept() {
            std::thread::sleep(Duration::from_secs(2));
            drop(stream);
        }
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn scenario_c_timed_out_target_is_reported_before_the_loop() {
    let url = serve_hang();
    let result =
        probe::check_reachability(&url, "0.25", probe::DEFAULT_USER_AGENT).await;
    assert_eq!(result, Reachability::Unreachable("timed out".to_string()));
}

#[tokio::test]
async fn non_ok_status_is_unreachable_with_the_status_code() {
    let url = serve_once("HTTP/1.1 404 Not Found");
    let result = probe::check_reachability(&url, "2", probe::DEFAULT_USER_AGENT).await;
    assert_eq!(result, Reachability::Unreachable("status 404".to_string()));
}

#[tokio::test]
async fn redirect_status_counts_as_reachable() {
    let url = serve_once("HTTP/1.1 302 Found");
    let result = probe::check_reachability(&url, "2", probe::DEFAULT_USER_AGENT).await;
    assert_eq!(result, Reachability::Reachable);
}

#[tokio::test]
async fn missing_wordlist_is_fatal_after_the_reachability_gate() {
    let url = serve_once("HTTP/1.1 200 OK");
    let runner = Runner::new(Options {
        url,
        wordlist: WordlistSource::FilePath("./no-such-wordlist-for-tests.txt".to_string()),
        timeout: "2".to_string(),
        ..Options::default()
    })
    .unwrap();

    let result = runner.run().await;
    assert!(matches!(result, Err(RunnerError::MissingWordlist { .. })));
}
