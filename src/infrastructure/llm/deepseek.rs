use crate::domain::ports::completion_port::{CompletionError, CompletionProvider};
use crate::infrastructure::llm::retry::call_with_retries;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Lower temperature keeps the JSON tail of the reply stable.
const TEMPERATURE: f64 = 0.5;
const MAX_TOKENS: u32 = 2000;
const BACKOFF_BASE: Duration = Duration::from_secs(2);

/// Chat-completion client for DeepSeek-compatible endpoints, with bounded
/// retries around transport-level failures. API-level failures (bad status,
/// empty choices) abort without retrying.
pub struct DeepSeekProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    max_retries: u32,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

impl DeepSeekProvider {
    pub fn new(
        api_key: String,
        base_url: String,
        model: String,
        timeout_secs: u64,
        max_retries: u32,
    ) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            max_retries,
        }
    }

    async fn call_once(&self, system_prompt: &str, user_prompt: &str) -> Result<String, CompletionError> {
        let mut messages = Vec::with_capacity(2);
        if !system_prompt.is_empty() {
            messages.push(ChatMessage {
                role: "system",
                content: system_prompt.to_string(),
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: user_prompt.to_string(),
        });

        let url = format!("{}/chat/completions", self.base_url);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&ChatRequest {
                model: self.model.clone(),
                messages,
                temperature: TEMPERATURE,
                max_tokens: MAX_TOKENS,
            })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CompletionError::Transport(format!("request timeout: {e}"))
                } else if e.is_connect() {
                    CompletionError::Transport(format!("connection error: {e}"))
                } else {
                    CompletionError::Transport(format!("network error: {e}"))
                }
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(CompletionError::Api(format!(
                "API returned error (status {status}): {body}"
            )));
        }

        let result: ChatResponse = resp
            .json()
            .await
            .map_err(|e| CompletionError::Api(format!("API response decode failed: {e}")))?;

        match result.choices.into_iter().next() {
            Some(choice) => Ok(choice.message.content),
            None => Err(CompletionError::Api("API returned empty response".into())),
        }
    }
}

#[async_trait::async_trait]
impl CompletionProvider for DeepSeekProvider {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String, CompletionError> {
        call_with_retries(self.max_retries, BACKOFF_BASE, |_n| {
            self.call_once(system_prompt, user_prompt)
        })
        .await
    }

    fn model(&self) -> &str {
        &self.model
    }
}
