use crate::domain::error::DomainError;
use serde::Deserialize;
use std::path::Path;

/// Runtime configuration loaded from a JSON file. Only the DeepSeek key is
/// required; every delivery integration is optional and the monitor runs
/// console-only without them.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub deepseek_api_key: String,
    #[serde(default = "default_base_url")]
    pub deepseek_base_url: String,
    #[serde(default = "default_model")]
    pub deepseek_model: String,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default)]
    pub telegram_bot_token: Option<String>,
    #[serde(default)]
    pub telegram_chat_id: Option<String>,

    #[serde(default)]
    pub chart_api_key: Option<String>,
    #[serde(default = "default_chart_api_url")]
    pub chart_api_url: String,
    #[serde(default = "default_chart_interval")]
    pub chart_interval: String,

    #[serde(default = "default_symbol")]
    pub symbol: String,
    #[serde(default = "default_interval_minutes")]
    pub analysis_interval_minutes: u64,

    #[serde(default = "default_initial_balance")]
    pub initial_balance: f64,
    #[serde(default = "default_btc_eth_leverage")]
    pub btc_eth_leverage: u32,
    #[serde(default = "default_altcoin_leverage")]
    pub altcoin_leverage: u32,

    #[serde(default = "default_log_dir")]
    pub log_dir: String,
}

fn default_base_url() -> String {
    "https://api.deepseek.com/v1".to_string()
}

fn default_model() -> String {
    "deepseek-chat".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_max_retries() -> u32 {
    3
}

fn default_chart_api_url() -> String {
    "https://api.chart-img.com/v2/tradingview/advanced-chart".to_string()
}

fn default_chart_interval() -> String {
    "1h".to_string()
}

fn default_symbol() -> String {
    "BTCUSDT".to_string()
}

fn default_interval_minutes() -> u64 {
    5
}

fn default_initial_balance() -> f64 {
    1000.0
}

fn default_btc_eth_leverage() -> u32 {
    5
}

fn default_altcoin_leverage() -> u32 {
    5
}

fn default_log_dir() -> String {
    "analysis_logs".to_string()
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| DomainError::Config(format!("cannot read {}: {e}", path.display())))?;
        let config: Config = serde_json::from_str(&raw)
            .map_err(|e| DomainError::Config(format!("invalid config {}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), DomainError> {
        if self.deepseek_api_key.trim().is_empty() {
            return Err(DomainError::Config("deepseek_api_key must not be empty".into()));
        }
        if self.analysis_interval_minutes == 0 {
            return Err(DomainError::Config("analysis_interval_minutes must be at least 1".into()));
        }
        if self.initial_balance <= 0.0 {
            return Err(DomainError::Config("initial_balance must be positive".into()));
        }
        Ok(())
    }

    /// Telegram delivery needs both the bot token and the chat id.
    pub fn telegram_enabled(&self) -> bool {
        matches!(
            (&self.telegram_bot_token, &self.telegram_chat_id),
            (Some(token), Some(chat)) if !token.is_empty() && !chat.is_empty()
        )
    }
}
