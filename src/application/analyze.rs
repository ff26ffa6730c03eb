use crate::application::extract::extract_analysis;
use crate::application::prompts::analysis::{build_system_prompt, build_user_prompt, format_analysis_message};
use crate::application::deliver_report;
use crate::domain::entities::cycle_record::{CycleKind, CycleRecord};
use crate::domain::ports::chart_port::ChartProvider;
use crate::domain::ports::completion_port::CompletionProvider;
use crate::domain::ports::cycle_log_port::CycleLog;
use crate::domain::ports::market_data_port::MarketDataSource;
use crate::domain::ports::notifier_port::Notifier;
use std::sync::Arc;

/// One full analysis cycle: market data -> prompts -> LLM -> extraction ->
/// delivery -> cycle log. Failures never escape: the returned record says
/// which stage failed and carries whatever was recovered.
pub struct AnalyzeUseCase {
    market: Arc<dyn MarketDataSource>,
    llm: Arc<dyn CompletionProvider>,
    chart: Option<Arc<dyn ChartProvider>>,
    notifier: Option<Arc<dyn Notifier>>,
    log: Arc<dyn CycleLog>,
}

impl AnalyzeUseCase {
    pub fn new(
        market: Arc<dyn MarketDataSource>,
        llm: Arc<dyn CompletionProvider>,
        chart: Option<Arc<dyn ChartProvider>>,
        notifier: Option<Arc<dyn Notifier>>,
        log: Arc<dyn CycleLog>,
    ) -> Self {
        Self {
            market,
            llm,
            chart,
            notifier,
            log,
        }
    }

    pub async fn execute(&self, cycle: u64, runtime_minutes: i64) -> CycleRecord {
        println!("Fetching market data...");
        let snapshot = match self.market.snapshot().await {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Market data fetch failed: {e}");
                return self.finish(CycleRecord::failed(CycleKind::Analysis, cycle, "market_data", e));
            }
        };
        println!(
            "  {} ${:.2} (15m {:+.2}% | 1h {:+.2}% | 4h {:+.2}%)",
            snapshot.symbol,
            snapshot.current_price,
            snapshot.price_changes.m15,
            snapshot.price_changes.h1,
            snapshot.price_changes.h4
        );

        let mut record = CycleRecord::new(CycleKind::Analysis, cycle);
        record.symbol = Some(snapshot.symbol.clone());
        record.current_price = Some(snapshot.current_price);
        record.price_changes = Some(snapshot.price_changes);

        let system_prompt = build_system_prompt();
        let user_prompt = build_user_prompt(&snapshot, runtime_minutes, cycle);

        println!("Calling {} for analysis...", self.llm.model());
        let raw = match self.llm.complete(&system_prompt, &user_prompt).await {
            Ok(text) => text,
            Err(e) => {
                eprintln!("AI call failed: {e}");
                record.error = Some(format!("ai_call: {e}"));
                return self.finish(record);
            }
        };

        let report = match extract_analysis(&raw) {
            Ok((trace, report)) => {
                record.cot_trace = Some(trace);
                if let Some(report) = &report {
                    println!(
                        "  market_state: {} | confidence: {:.0}%",
                        report.market_state.as_deref().unwrap_or("n/a"),
                        report.confidence.unwrap_or(0.0)
                    );
                } else {
                    println!("  text-only reply, no structured summary");
                }
                report
            }
            Err(e) => {
                // The reasoning survived even though the payload did not.
                eprintln!("Extraction failed: {e}");
                record.cot_trace = Some(e.trace().to_string());
                record.error = Some(format!("extraction: {e}"));
                None
            }
        };

        let message = format_analysis_message(
            record.cot_trace.as_deref().unwrap_or_default(),
            report.as_ref(),
            &snapshot.symbol,
        );
        let caption = format!("{} analysis #{cycle}", snapshot.symbol);
        let (attached, sent) =
            deliver_report(self.notifier.as_ref(), self.chart.as_ref(), &message, &caption).await;

        record.analysis = report;
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
