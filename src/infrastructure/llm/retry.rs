use crate::domain::ports::completion_port::CompletionError;
use std::future::Future;
use std::time::Duration;

/// Run `attempt` up to `max_attempts` times. A fatal error aborts
/// immediately; a retryable one sleeps `attempt_number * backoff_base`
/// before the next try, so the wait grows with each failure. When every
/// attempt fails, the last error is wrapped in `Exhausted`.
pub async fn call_with_retries<F, Fut>(
    max_attempts: u32,
    backoff_base: Duration,
    mut attempt: F,
) -> Result<String, CompletionError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<String, CompletionError>>,
{
    let mut last_error: Option<CompletionError> = None;

    for n in 1..=max_attempts {
        if n > 1 {
            eprintln!("AI call failed, retrying ({n}/{max_attempts})...");
        }

        match attempt(n).await {
            Ok(text) => {
                if n > 1 {
                    eprintln!("AI call retry succeeded");
                }
                return Ok(text);
            }
            Err(e) => {
                if !e.is_retryable() {
                    return Err(e);
                }
                if n < max_attempts {
                    let wait = backoff_base * n;
                    eprintln!("Waiting {}s before retry...", wait.as_secs());
                    tokio::time::sleep(wait).await;
                }
                last_error = Some(e);
            }
        }
    }

    Err(CompletionError::Exhausted {
        attempts: max_attempts,
        last: last_error.map(|e| e.to_string()).unwrap_or_default(),
    })
}
