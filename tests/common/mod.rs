//! Shared test helpers: in-process doubles for every external integration
//! plus a market snapshot fixture.

use async_trait::async_trait;
use chrono::Utc;
use marketpulse::domain::entities::cycle_record::CycleRecord;
use marketpulse::domain::entities::market_snapshot::{
    CurrentIndicators, MarketSnapshot, OpenInterest, PriceChanges, TimeframeSeries,
};
use marketpulse::domain::ports::completion_port::{CompletionError, CompletionProvider};
use marketpulse::domain::ports::cycle_log_port::CycleLog;
use marketpulse::domain::ports::market_data_port::MarketDataSource;
use marketpulse::domain::ports::notifier_port::Notifier;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Completion provider replaying a scripted sequence of outcomes.
pub struct ScriptedCompletion {
    replies: Mutex<VecDeque<Result<String, CompletionError>>>,
    pub calls: Mutex<u32>,
}

impl ScriptedCompletion {
    pub fn new(replies: Vec<Result<String, CompletionError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(0),
        }
    }

    pub fn reply(text: &str) -> Self {
        Self::new(vec![Ok(text.to_string())])
    }
}

#[async_trait]
impl CompletionProvider for ScriptedCompletion {
    async fn complete(&self, _system: &str, _user: &str) -> Result<String, CompletionError> {
        *self.calls.lock().unwrap() += 1;
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(CompletionError::Api("script exhausted".into())))
    }

    fn model(&self) -> &str {
        "scripted"
    }
}

/// Market source returning a fixed snapshot (or a fixed error).
pub struct FixedMarket {
    result: Result<MarketSnapshot, String>,
}

impl FixedMarket {
    pub fn ok() -> Self {
        Self {
            result: Ok(snapshot_fixture()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            result: Err(message.to_string()),
        }
    }
}

#[async_trait]
impl MarketDataSource for FixedMarket {
    async fn snapshot(&self) -> Result<MarketSnapshot, String> {
        self.result.clone()
    }
}

/// Notifier capturing everything it is asked to send.
#[derive(Default)]
pub struct RecordingNotifier {
    pub texts: Mutex<Vec<String>>,
    pub photos: Mutex<Vec<String>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_text(&self, html: &str) -> Result<(), String> {
        self.texts.lock().unwrap().push(html.to_string());
        Ok(())
    }

    async fn send_photo(&self, caption: &str, _png: &[u8]) -> Result<(), String> {
        self.photos.lock().unwrap().push(caption.to_string());
        Ok(())
    }
}

/// In-memory cycle log.
#[derive(Default)]
pub struct MemoryLog {
    pub records: Mutex<Vec<CycleRecord>>,
}

impl CycleLog for MemoryLog {
    fn append(&self, record: &CycleRecord) -> Result<(), String> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}

fn series_fixture(timeframe: &str, base: f64) -> TimeframeSeries {
    let prices: Vec<f64> = (0..10).map(|i| base + i as f64 * 10.0).collect();
    let last = prices[prices.len() - 1];
    TimeframeSeries {
        timeframe: timeframe.to_string(),
        data_points: prices.len(),
        highs: prices.iter().map(|p| p + 5.0).collect(),
        lows: prices.iter().map(|p| p - 5.0).collect(),
        ema20: prices.iter().map(|p| p - 20.0).collect(),
        ema50: prices.iter().map(|p| p - 50.0).collect(),
        macd: vec![1.5; 10],
        macd_signal: vec![1.0; 10],
        macd_hist: vec![0.5; 10],
        rsi7: vec![60.0; 10],
        rsi14: vec![55.0; 10],
        atr14: vec![120.0; 10],
        bb_upper: vec![last + 200.0; 10],
        bb_middle: vec![last; 10],
        bb_lower: vec![last - 200.0; 10],
        volumes: vec![1000.0; 10],
        volume_ma: vec![900.0; 10],
        current: CurrentIndicators {
            price: last,
            ema20: last - 20.0,
            ema50: last - 50.0,
            macd: 1.5,
            rsi7: 60.0,
            rsi14: 55.0,
            atr14: 120.0,
            volume: 1000.0,
            volume_ma: 900.0,
        },
        prices,
    }
}

pub fn snapshot_fixture() -> MarketSnapshot {
    MarketSnapshot {
        symbol: "BTCUSDT".to_string(),
        current_price: 94090.0,
        price_changes: PriceChanges {
            m15: 0.4,
            h1: 1.1,
            h4: -0.8,
            h24: 2.3,
        },
        current_ema20: 94070.0,
        current_macd: 1.5,
        current_rsi7: 60.0,
        open_interest: OpenInterest {
            latest: 85000.0,
            average: 84000.0,
        },
        funding_rate: 0.0001,
        timeframe_3m: series_fixture("3m", 94000.0),
        timeframe_15m: series_fixture("15m", 93900.0),
        timeframe_1h: series_fixture("1h", 93500.0),
        timeframe_4h: series_fixture("4h", 92000.0),
        timestamp: Utc::now(),
    }
}
