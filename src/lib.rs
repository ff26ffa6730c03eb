pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

use crate::application::analyze::AnalyzeUseCase;
use crate::application::trade::TradeCycleUseCase;
use crate::config::Config;
use crate::domain::entities::account::PaperAccount;
use crate::domain::entities::cycle_record::CycleRecord;
use crate::domain::entities::market_snapshot::MarketSnapshot;
use crate::domain::error::DomainError;
use crate::domain::ports::chart_port::ChartProvider;
use crate::domain::ports::completion_port::CompletionProvider;
use crate::domain::ports::cycle_log_port::CycleLog;
use crate::domain::ports::market_data_port::MarketDataSource;
use crate::domain::ports::notifier_port::Notifier;
use crate::infrastructure::chart::ChartImgProvider;
use crate::infrastructure::jsonl_log::JsonlCycleLog;
use crate::infrastructure::llm::deepseek::DeepSeekProvider;
use crate::infrastructure::market::binance::BinanceFutures;
use crate::infrastructure::telegram::TelegramNotifier;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;

pub struct MarketPulse {
    market: Arc<dyn MarketDataSource>,
    analyze_uc: AnalyzeUseCase,
    trade_uc: TradeCycleUseCase,
    started_at: DateTime<Utc>,
}

impl MarketPulse {
    pub fn new(config: &Config) -> Result<Self, DomainError> {
        let llm: Arc<dyn CompletionProvider> = Arc::new(DeepSeekProvider::new(
            config.deepseek_api_key.clone(),
            config.deepseek_base_url.clone(),
            config.deepseek_model.clone(),
            config.request_timeout_secs,
            config.max_retries,
        ));

        let market: Arc<dyn MarketDataSource> = Arc::new(BinanceFutures::new(config.symbol.clone()));

        let notifier: Option<Arc<dyn Notifier>> = if config.telegram_enabled() {
            let token = config.telegram_bot_token.clone().unwrap_or_default();
            let chat = config.telegram_chat_id.clone().unwrap_or_default();
            Some(Arc::new(TelegramNotifier::new(token, chat)))
        } else {
            println!("Telegram not configured, reports go to the console only");
            None
        };

        let chart: Option<Arc<dyn ChartProvider>> = config.chart_api_key.as_ref().map(|key| {
            Arc::new(ChartImgProvider::new(
                key.clone(),
                config.chart_api_url.clone(),
                config.symbol.clone(),
                config.chart_interval.clone(),
            )) as Arc<dyn ChartProvider>
        });

        let log: Arc<dyn CycleLog> = Arc::new(JsonlCycleLog::new(config.log_dir.clone()));

        Ok(Self::with_providers(
            market,
            llm,
            chart,
            notifier,
            log,
            PaperAccount::new(config.initial_balance),
            config.btc_eth_leverage,
            config.altcoin_leverage,
        ))
    }

    /// Wire the monitor from explicit providers. Lets tests swap every
    /// external integration for an in-process double.
    #[allow(clippy::too_many_arguments)]
    pub fn with_providers(
        market: Arc<dyn MarketDataSource>,
        llm: Arc<dyn CompletionProvider>,
        chart: Option<Arc<dyn ChartProvider>>,
        notifier: Option<Arc<dyn Notifier>>,
        log: Arc<dyn CycleLog>,
        account: PaperAccount,
        btc_eth_leverage: u32,
        altcoin_leverage: u32,
    ) -> Self {
        Self {
            market: market.clone(),
            analyze_uc: AnalyzeUseCase::new(
                market.clone(),
                llm.clone(),
                chart.clone(),
                notifier.clone(),
                log.clone(),
            ),
            trade_uc: TradeCycleUseCase::new(
                market,
                llm,
                chart,
                notifier,
                log,
                account,
                btc_eth_leverage,
                altcoin_leverage,
            ),
            started_at: Utc::now(),
        }
    }

    fn runtime_minutes(&self) -> i64 {
        (Utc::now() - self.started_at).num_minutes()
    }

    pub async fn analyze_once(&self, cycle: u64) -> CycleRecord {
        self.analyze_uc.execute(cycle, self.runtime_minutes()).await
    }

    pub async fn trade_once(&self, cycle: u64) -> CycleRecord {
        self.trade_uc.execute(cycle, self.runtime_minutes()).await
    }

    pub async fn snapshot(&self) -> Result<MarketSnapshot, DomainError> {
        self.market.snapshot().await.map_err(DomainError::MarketData)
    }

    /// Run analysis cycles forever, `interval_minutes` apart. A failed cycle
    /// is logged and the loop keeps going.
    pub async fn run_analysis_loop(&self, interval_minutes: u64) {
        let mut cycle: u64 = 0;
        loop {
            cycle += 1;
            println!("\n=== Analysis cycle #{cycle} ===");
            let record = self.analyze_once(cycle).await;
            if let Some(error) = &record.error {
                eprintln!("Cycle #{cycle} failed: {error}");
            }
            println!("Sleeping {interval_minutes} minutes...");
            tokio::time::sleep(Duration::from_secs(interval_minutes * 60)).await;
        }
    }

    /// Run trading cycles forever, `interval_minutes` apart.
    pub async fn run_trading_loop(&self, interval_minutes: u64) {
        let mut cycle: u64 = 0;
        loop {
            cycle += 1;
            println!("\n=== Trading cycle #{cycle} ===");
            let record = self.trade_once(cycle).await;
            if let Some(error) = &record.error {
                eprintln!("Cycle #{cycle} failed: {error}");
            }
            println!("Sleeping {interval_minutes} minutes...");
            tokio::time::sleep(Duration::from_secs(interval_minutes * 60)).await;
        }
    }
}
