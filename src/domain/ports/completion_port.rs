use thiserror::Error;

/// Substrings that mark an attempt error as transient and worth retrying.
/// Deliberately coarse: classification is textual, and new transient
/// phrasings require extending this list.
const RETRYABLE_MARKERS: [&str; 5] = ["timeout", "connection", "temporary", "network", "eof"];

#[derive(Debug, Clone, Error)]
pub enum CompletionError {
    /// Transport-level trouble (timeout, refused connection, ...). Handled
    /// inside the client's retry loop.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The endpoint answered but the answer is unusable: non-2xx status
    /// with an error body, or a 2xx response missing choices. Fatal for the
    /// whole call, not just the attempt.
    #[error("API error: {0}")]
    Api(String),

    /// All attempts were spent; wraps the last error observed.
    #[error("AI call failed after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: String },
}

impl CompletionError {
    pub fn is_retryable(&self) -> bool {
        match self {
            CompletionError::Exhausted { .. } => false,
            _ => is_retryable_message(&self.to_string()),
        }
    }
}

/// Coarse textual classification of an attempt error.
pub fn is_retryable_message(message: &str) -> bool {
    let lowered = message.to_lowercase();
    RETRYABLE_MARKERS.iter().any(|m| lowered.contains(m))
}

/// Chat-style completion endpoint issuing one synchronous request at a time.
#[async_trait::async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Send a two-message (system + user) completion request and return the
    /// raw response text. Implementations own their retry policy.
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String, CompletionError>;

    /// Model identifier, for operator output.
    fn model(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_phrases_are_retryable() {
        assert!(is_retryable_message("error sending request: operation timed out... timeout"));
        assert!(is_retryable_message("Connection refused"));
        assert!(is_retryable_message("server says: Temporary failure"));
        assert!(is_retryable_message("network unreachable"));
        assert!(is_retryable_message("unexpected EOF while reading body"));
    }

    #[test]
    fn test_api_errors_are_fatal() {
        assert!(!is_retryable_message("API returned error (status 400): invalid model"));
        assert!(!is_retryable_message("API returned empty response"));
    }

    #[test]
    fn test_exhausted_never_retryable() {
        let err = CompletionError::Exhausted {
            attempts: 3,
            last: "timeout".into(),
        };
        assert!(!err.is_retryable());
    }
}
