mod common;

use common::{FixedMarket, MemoryLog, RecordingNotifier, ScriptedCompletion};
use marketpulse::domain::entities::account::PaperAccount;
use marketpulse::domain::entities::cycle_record::CycleKind;
use marketpulse::domain::ports::completion_port::CompletionError;
use marketpulse::domain::values::trade_action::TradeAction;
use marketpulse::MarketPulse;
use std::sync::Arc;

fn setup(
    market: FixedMarket,
    llm: ScriptedCompletion,
) -> (MarketPulse, Arc<MemoryLog>, Arc<RecordingNotifier>) {
    let log = Arc::new(MemoryLog::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let monitor = MarketPulse::with_providers(
        Arc::new(market),
        Arc::new(llm),
        None,
        Some(notifier.clone()),
        log.clone(),
        PaperAccount::new(1000.0),
        5,
        5,
    );
    (monitor, log, notifier)
}

#[tokio::test]
async fn test_analysis_cycle_happy_path() {
    let reply = "The trend is up across timeframes.\n\
                 {\"market_state\": \"uptrend\", \"confidence\": 82, \"summary\": \"bullish\"}";
    let (monitor, log, notifier) = setup(FixedMarket::ok(), ScriptedCompletion::reply(reply));

    let record = monitor.analyze_once(1).await;

    assert!(record.success);
    assert_eq!(record.kind, CycleKind::Analysis);
    assert_eq!(record.symbol.as_deref(), Some("BTCUSDT"));
    assert_eq!(record.cot_trace.as_deref(), Some("The trend is up across timeframes."));
    let analysis = record.analysis.as_ref().unwrap();
    assert_eq!(analysis.market_state.as_deref(), Some("uptrend"));
    assert!(record.telegram_sent);
    assert!(!record.chart_attached);

    assert_eq!(log.records.lock().unwrap().len(), 1);
    let texts = notifier.texts.lock().unwrap();
    assert_eq!(texts.len(), 1);
    assert!(texts[0].contains("uptrend"));
}

#[tokio::test]
async fn test_analysis_text_only_reply_is_success() {
    let (monitor, log, _) = setup(
        FixedMarket::ok(),
        ScriptedCompletion::reply("No clear structure in the market right now."),
    );

    let record = monitor.analyze_once(1).await;

    assert!(record.success);
    assert!(record.analysis.is_none());
    assert_eq!(
        record.cot_trace.as_deref(),
        Some("No clear structure in the market right now.")
    );
    assert_eq!(log.records.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_analysis_extraction_failure_keeps_trace_and_notifies() {
    let reply = "truncated reasoning {\"market_state\": \"up\"";
    let (monitor, log, notifier) = setup(FixedMarket::ok(), ScriptedCompletion::reply(reply));

    let record = monitor.analyze_once(1).await;

    assert!(!record.success);
    assert!(record.error.as_deref().unwrap().starts_with("extraction:"));
    assert_eq!(record.cot_trace.as_deref(), Some("truncated reasoning"));
    assert!(record.analysis.is_none());
    // The reasoning still reaches the operator and the log.
    assert!(record.telegram_sent);
    assert!(notifier.texts.lock().unwrap()[0].contains("truncated reasoning"));
    assert_eq!(log.records.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_market_failure_is_recorded_not_propagated() {
    let (monitor, log, notifier) = setup(
        FixedMarket::failing("klines fetch: connection refused"),
        ScriptedCompletion::reply("unused"),
    );

    let record = monitor.analyze_once(3).await;

    assert!(!record.success);
    assert_eq!(record.cycle, 3);
    assert_eq!(
        record.error.as_deref(),
        Some("market_data: klines fetch: connection refused")
    );
    assert!(record.symbol.is_none());
    assert!(notifier.texts.lock().unwrap().is_empty());
    assert_eq!(log.records.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_ai_failure_is_recorded_with_market_context() {
    let (monitor, log, _) = setup(
        FixedMarket::ok(),
        ScriptedCompletion::new(vec![Err(CompletionError::Exhausted {
            attempts: 3,
            last: "Transport error: request timeout".into(),
        })]),
    );

    let record = monitor.analyze_once(1).await;

    assert!(!record.success);
    assert!(record.error.as_deref().unwrap().starts_with("ai_call:"));
    // Market data was already fetched, so the record carries it.
    assert_eq!(record.symbol.as_deref(), Some("BTCUSDT"));
    assert!(record.current_price.is_some());
    assert_eq!(log.records.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_trading_cycle_parses_decisions() {
    let reply = "BTC looks strong, opening a long.\n\
                 [{\"symbol\": \"BTCUSDT\", \"action\": \"open_long\", \"leverage\": 5, \
                   \"position_size_usd\": 5000, \"stop_loss\": 91000, \"take_profit\": 99000, \
                   \"confidence\": 85, \"risk_usd\": 300, \"reasoning\": \"trend resonance\"}]";
    let (monitor, log, notifier) = setup(FixedMarket::ok(), ScriptedCompletion::reply(reply));

    let record = monitor.trade_once(1).await;

    assert!(record.success);
    assert_eq!(record.kind, CycleKind::Trading);
    assert_eq!(record.decisions.len(), 1);
    assert_eq!(record.decisions[0].kind(), TradeAction::OpenLong);
    assert_eq!(record.sharpe_ratio, Some(0.0));
    assert!(record.account.is_some());

    let texts = notifier.texts.lock().unwrap();
    assert!(texts[0].contains("open_long"));
    assert!(texts[0].contains("Stop loss: $91000.00"));
    assert_eq!(log.records.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_trading_cycle_no_bracket_means_no_trade() {
    let (monitor, _, notifier) = setup(
        FixedMarket::ok(),
        ScriptedCompletion::reply("Choppy range, staying flat this cycle."),
    );

    let record = monitor.trade_once(1).await;

    assert!(record.success);
    assert!(record.decisions.is_empty());
    assert!(notifier.texts.lock().unwrap()[0].contains("No trade this cycle"));
}

#[tokio::test]
async fn test_trading_unbalanced_array_is_error_with_empty_decisions() {
    let reply = "cut off by the token limit [{\"symbol\": \"BTCUSDT\", \"action\": \"open_long\"";
    let (monitor, log, notifier) = setup(FixedMarket::ok(), ScriptedCompletion::reply(reply));

    let record = monitor.trade_once(1).await;

    assert!(!record.success);
    assert!(record.error.as_deref().unwrap().starts_with("extraction:"));
    assert!(record.decisions.is_empty());
    assert_eq!(record.cot_trace.as_deref(), Some("cut off by the token limit"));
    // Degraded delivery still happens.
    assert!(record.telegram_sent);
    assert_eq!(notifier.texts.lock().unwrap().len(), 1);
    assert_eq!(log.records.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_unknown_action_survives_to_the_report() {
    let reply = "[{\"symbol\": \"BTCUSDT\", \"action\": \"yolo_in\"}]";
    let (monitor, _, notifier) = setup(FixedMarket::ok(), ScriptedCompletion::reply(reply));

    let record = monitor.trade_once(1).await;

    assert!(record.success);
    assert_eq!(record.decisions[0].kind(), TradeAction::Unknown);
    assert_eq!(record.decisions[0].action, "yolo_in");
    assert!(notifier.texts.lock().unwrap()[0].contains("yolo_in (unknown)"));
}
