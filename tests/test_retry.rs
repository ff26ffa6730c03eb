use marketpulse::domain::ports::completion_port::CompletionError;
use marketpulse::infrastructure::llm::retry::call_with_retries;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

const NO_WAIT: Duration = Duration::from_millis(1);

#[tokio::test]
async fn test_first_attempt_success_makes_one_call() {
    let calls = AtomicU32::new(0);
    let result = call_with_retries(3, NO_WAIT, |_| {
        calls.fetch_add(1, Ordering::SeqCst);
        async { Ok("reply".to_string()) }
    })
    .await;

    assert_eq!(result.unwrap(), "reply");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_transient_failures_then_success() {
    let calls = AtomicU32::new(0);
    let result = call_with_retries(3, NO_WAIT, |n| {
        calls.fetch_add(1, Ordering::SeqCst);
        async move {
            if n < 3 {
                Err(CompletionError::Transport("connection reset".into()))
            } else {
                Ok("recovered".to_string())
            }
        }
    })
    .await;

    assert_eq!(result.unwrap(), "recovered");
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_fatal_api_error_aborts_immediately() {
    let calls = AtomicU32::new(0);
    let result = call_with_retries(3, NO_WAIT, |_| {
        calls.fetch_add(1, Ordering::SeqCst);
        async { Err(CompletionError::Api("API returned error (status 400): bad request".into())) }
    })
    .await;

    assert!(matches!(result, Err(CompletionError::Api(_))));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_exhaustion_wraps_last_error() {
    let calls = AtomicU32::new(0);
    let result = call_with_retries(3, NO_WAIT, |n| {
        calls.fetch_add(1, Ordering::SeqCst);
        async move { Err(CompletionError::Transport(format!("request timeout on attempt {n}"))) }
    })
    .await;

    assert_eq!(calls.load(Ordering::SeqCst), 3);
    match result.unwrap_err() {
        CompletionError::Exhausted { attempts, last } => {
            assert_eq!(attempts, 3);
            assert!(last.contains("request timeout on attempt 3"));
        }
        other => panic!("expected Exhausted, got {other:?}"),
    }
}
