use crate::application::extract::ExtractError;
use crate::domain::ports::completion_port::CompletionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Market data error: {0}")]
    MarketData(String),

    #[error("AI call failed: {0}")]
    Completion(#[from] CompletionError),

    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractError),

    #[error("Notification error: {0}")]
    Notify(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Log error: {0}")]
    Log(String),
}

impl From<String> for DomainError {
    fn from(s: String) -> Self {
        DomainError::MarketData(s)
    }
}
