use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Complete multi-timeframe view of one instrument, as handed to prompt
/// construction. The extraction core treats this as opaque input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub symbol: String,
    pub current_price: f64,
    pub price_changes: PriceChanges,
    pub current_ema20: f64,
    pub current_macd: f64,
    pub current_rsi7: f64,
    pub open_interest: OpenInterest,
    pub funding_rate: f64,
    pub timeframe_3m: TimeframeSeries,
    pub timeframe_15m: TimeframeSeries,
    pub timeframe_1h: TimeframeSeries,
    pub timeframe_4h: TimeframeSeries,
    pub timestamp: DateTime<Utc>,
}

impl MarketSnapshot {
    pub fn timeframes(&self) -> [(&'static str, &TimeframeSeries); 4] {
        [
            ("3m", &self.timeframe_3m),
            ("15m", &self.timeframe_15m),
            ("1h", &self.timeframe_1h),
            ("4h", &self.timeframe_4h),
        ]
    }
}

/// Percentage price changes over the standard horizons.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PriceChanges {
    #[serde(rename = "15m")]
    pub m15: f64,
    #[serde(rename = "1h")]
    pub h1: f64,
    #[serde(rename = "4h")]
    pub h4: f64,
    #[serde(rename = "24h")]
    pub h24: f64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct OpenInterest {
    pub latest: f64,
    pub average: f64,
}

/// Indicator series for one timeframe, trimmed to the most recent
/// `data_points` bars. All series are aligned with `prices`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeframeSeries {
    pub timeframe: String,
    pub data_points: usize,
    pub prices: Vec<f64>,
    pub highs: Vec<f64>,
    pub lows: Vec<f64>,
    pub ema20: Vec<f64>,
    pub ema50: Vec<f64>,
    pub macd: Vec<f64>,
    pub macd_signal: Vec<f64>,
    pub macd_hist: Vec<f64>,
    pub rsi7: Vec<f64>,
    pub rsi14: Vec<f64>,
    pub atr14: Vec<f64>,
    pub bb_upper: Vec<f64>,
    pub bb_middle: Vec<f64>,
    pub bb_lower: Vec<f64>,
    pub volumes: Vec<f64>,
    pub volume_ma: Vec<f64>,
    pub current: CurrentIndicators,
}

/// Latest-bar indicator values for quick trend checks.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CurrentIndicators {
    pub price: f64,
    pub ema20: f64,
    pub ema50: f64,
    pub macd: f64,
    pub rsi7: f64,
    pub rsi14: f64,
    pub atr14: f64,
    pub volume: f64,
    pub volume_ma: f64,
}

impl TimeframeSeries {
    /// Price position inside the Bollinger band, 0..100 (50 when the band
    /// has no width).
    pub fn bollinger_position(&self) -> f64 {
        let (upper, lower) = match (self.bb_upper.last(), self.bb_lower.last()) {
            (Some(u), Some(l)) if u > l => (*u, *l),
            _ => return 50.0,
        };
        (self.current.price - lower) / (upper - lower) * 100.0
    }

    /// Current volume as a percentage of its moving average.
    pub fn volume_ratio(&self) -> f64 {
        if self.current.volume_ma > 0.0 {
            self.current.volume / self.current.volume_ma * 100.0
        } else {
            100.0
        }
    }

    /// Simple EMA stack reading used in the prompts.
    pub fn ema_trend(&self) -> &'static str {
        let c = &self.current;
        if c.price > c.ema20 && c.ema20 > c.ema50 {
            "up"
        } else if c.price < c.ema20 && c.ema20 < c.ema50 {
            "down"
        } else {
            "sideways"
        }
    }
}
