use crate::application::deliver_report;
use crate::application::extract::extract_decisions;
use crate::application::prompts::trading::{build_system_prompt, build_user_prompt, format_trading_message};
use crate::domain::entities::account::PaperAccount;
use crate::domain::entities::cycle_record::{CycleKind, CycleRecord};
use crate::domain::ports::chart_port::ChartProvider;
use crate::domain::ports::completion_port::CompletionProvider;
use crate::domain::ports::cycle_log_port::CycleLog;
use crate::domain::ports::market_data_port::MarketDataSource;
use crate::domain::ports::notifier_port::Notifier;
use std::sync::Arc;

/// One trading cycle: market data -> decision prompts (with Sharpe
/// feedback) -> LLM -> decision extraction -> delivery -> cycle log.
/// Decisions are interpreted and reported, never executed.
pub struct TradeCycleUseCase {
    market: Arc<dyn MarketDataSource>,
    llm: Arc<dyn CompletionProvider>,
    chart: Option<Arc<dyn ChartProvider>>,
    notifier: Option<Arc<dyn Notifier>>,
    log: Arc<dyn CycleLog>,
    account: PaperAccount,
    btc_eth_leverage: u32,
    altcoin_leverage: u32,
}

impl TradeCycleUseCase {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
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
            market,
            llm,
            chart,
            notifier,
            log,
            account,
            btc_eth_leverage,
            altcoin_leverage,
        }
    }

    pub fn account(&self) -> &PaperAccount {
        &self.account
    }

    pub async fn execute(&self, cycle: u64, runtime_minutes: i64) -> CycleRecord {
        println!("Fetching market data...");
        let snapshot = match self.market.snapshot().await {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Market data fetch failed: {e}");
                return self.finish(CycleRecord::failed(CycleKind::Trading, cycle, "market_data", e));
            }
        };
        let sharpe = self.account.sharpe_ratio();
        println!(
            "  {} ${:.2} | equity ${:.2} | sharpe {:.2}",
            snapshot.symbol, snapshot.current_price, self.account.total_equity, sharpe
        );

        let mut record = CycleRecord::new(CycleKind::Trading, cycle);
        record.symbol = Some(snapshot.symbol.clone());
        record.current_price = Some(snapshot.current_price);
        record.price_changes = Some(snapshot.price_changes);
        record.account = Some(self.account.clone());
        record.sharpe_ratio = Some(sharpe);

        let system_prompt =
            build_system_prompt(self.account.total_equity, self.btc_eth_leverage, self.altcoin_leverage);
        let user_prompt = build_user_prompt(&snapshot, runtime_minutes, cycle, &self.account, sharpe);

        println!("Calling {} for trading decisions...", self.llm.model());
        let raw = match self.llm.complete(&system_prompt, &user_prompt).await {
            Ok(text) => text,
            Err(e) => {
                eprintln!("AI call failed: {e}");
                record.error = Some(format!("ai_call: {e}"));
                return self.finish(record);
            }
        };

        let decisions = match extract_decisions(&raw) {
            Ok((trace, decisions)) => {
                record.cot_trace = Some(trace);
                if decisions.is_empty() {
                    println!("  no trade this cycle");
                } else {
                    for decision in &decisions {
                        println!("  {} {} -> {}", decision.kind().emoji(), decision.symbol, decision.action);
                    }
                }
                decisions
            }
            Err(e) => {
                eprintln!("Extraction failed: {e}");
                record.cot_trace = Some(e.trace().to_string());
                record.error = Some(format!("extraction: {e}"));
                Vec::new()
            }
        };

        let message = format_trading_message(
            record.cot_trace.as_deref().unwrap_or_default(),
            &decisions,
            &self.account,
        );
        let caption = format!("{} trading cycle #{cycle}", snapshot.symbol);
        let (attached, sent) =
            deliver_report(self.notifier.as_ref(), self.chart.as_ref(), &message, &caption).await;

        record.decisions = decisions;
        record.chart_attached = attached;
        record.telegram_sent = sent;
        record.success = record.error.is_none();
        self.finish(record)
    }

    fn finish(&self, record: CycleRecord) -> CycleRecord {
        if let Err(e) = self.log.append(&record) {
            eprintln!("Warning: cycle log append failed: {e}");
        }
        record
    }
}
