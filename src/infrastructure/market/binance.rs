use crate::domain::entities::market_snapshot::{
    CurrentIndicators, MarketSnapshot, OpenInterest, PriceChanges, TimeframeSeries,
};
use crate::domain::ports::market_data_port::MarketDataSource;
use crate::infrastructure::market::indicators::{atr, bollinger, ema, macd, price_change_pct, rsi, sma};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;

const DEFAULT_BASE_URL: &str = "https://fapi.binance.com";

/// Binance USDT-M futures market data source. Pulls klines for four
/// timeframes plus open interest and funding rate, and computes the
/// indicator series the prompts expect.
pub struct BinanceFutures {
    client: reqwest::Client,
    base_url: String,
    symbol: String,
}

#[derive(Debug, Clone, Copy)]
pub struct Kline {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl BinanceFutures {
    pub fn new(symbol: String) -> Self {
        Self::with_base_url(symbol, DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(symbol: String, base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            symbol,
        }
    }

    async fn fetch_klines(&self, interval: &str, limit: usize) -> Result<Vec<Kline>, String> {
        let url = format!(
            "{}/fapi/v1/klines?symbol={}&interval={interval}&limit={limit}",
            self.base_url, self.symbol
        );
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| format!("klines request failed: {e}"))?;

        if !resp.status().is_success() {
            return Err(format!("klines API returned {} for {interval}", resp.status()));
        }

        let rows: Vec<Vec<Value>> = resp
            .json()
            .await
            .map_err(|e| format!("klines parse failed: {e}"))?;

        let mut klines = Vec::with_capacity(rows.len());
        for row in &rows {
            klines.push(Kline {
                open: field_f64(row, 1)?,
                high: field_f64(row, 2)?,
                low: field_f64(row, 3)?,
                close: field_f64(row, 4)?,
                volume: field_f64(row, 5)?,
            });
        }
        if klines.is_empty() {
            return Err(format!("klines API returned no bars for {interval}"));
        }
        Ok(klines)
    }

    /// Open interest; degrades to zero on failure rather than failing the
    /// whole snapshot.
    async fn fetch_open_interest(&self) -> OpenInterest {
        let url = format!("{}/fapi/v1/openInterest?symbol={}", self.base_url, self.symbol);
        match self.fetch_json(&url).await {
            Ok(v) => {
                let latest = v
                    .get("openInterest")
                    .and_then(|x| x.as_str())
                    .and_then(|s| s.parse::<f64>().ok())
                    .unwrap_or(0.0);
                OpenInterest {
                    latest,
                    average: latest,
                }
            }
            Err(e) => {
                eprintln!("Warning: open interest fetch failed: {e}");
                OpenInterest::default()
            }
        }
    }

    /// Funding rate; degrades to zero on failure.
    async fn fetch_funding_rate(&self) -> f64 {
        let url = format!("{}/fapi/v1/premiumIndex?symbol={}", self.base_url, self.symbol);
        match self.fetch_json(&url).await {
            Ok(v) => v
                .get("lastFundingRate")
                .and_then(|x| x.as_str())
                .and_then(|s| s.parse::<f64>().ok())
                .unwrap_or(0.0),
            Err(e) => {
                eprintln!("Warning: funding rate fetch failed: {e}");
                0.0
            }
        }
    }

    async fn fetch_json(&self, url: &str) -> Result<Value, String> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| format!("request failed: {e}"))?;
        if !resp.status().is_success() {
            return Err(format!("API returned {}", resp.status()));
        }
        resp.json().await.map_err(|e| format!("parse failed: {e}"))
    }
}

fn field_f64(row: &[Value], index: usize) -> Result<f64, String> {
    row.get(index)
        .and_then(|v| v.as_str())
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| format!("kline field {index} missing or not numeric"))
}

/// How many recent points each timeframe exposes to the model: shorter
/// timeframes carry more points.
fn series_points(timeframe: &str) -> usize {
    match timeframe {
        "3m" => 30,
        "15m" => 24,
        "1h" => 24,
        _ => 20,
    }
}

fn tail(values: &[f64], n: usize) -> Vec<f64> {
    values[values.len().saturating_sub(n)..].to_vec()
}

/// Compute the full indicator series for one timeframe from raw klines.
pub fn build_series(timeframe: &str, klines: &[Kline]) -> TimeframeSeries {
    let closes: Vec<f64> = klines.iter().map(|k| k.close).collect();
    let highs: Vec<f64> = klines.iter().map(|k| k.high).collect();
    let lows: Vec<f64> = klines.iter().map(|k| k.low).collect();
    let volumes: Vec<f64> = klines.iter().map(|k| k.volume).collect();

    let ema20 = ema(&closes, 20);
    let ema50 = ema(&closes, 50);
    let (macd_line, macd_signal, macd_hist) = macd(&closes);
    let rsi7 = rsi(&closes, 7);
    let rsi14 = rsi(&closes, 14);
    let atr14 = atr(&highs, &lows, &closes, 14);
    let (bb_upper, bb_middle, bb_lower) = bollinger(&closes, 20, 2.0);
    let volume_ma = sma(&volumes, 20);

    let n = series_points(timeframe);
    let last = |v: &[f64]| v.last().copied().unwrap_or(0.0);

    let current = CurrentIndicators {
        price: last(&closes),
        ema20: last(&ema20),
        ema50: last(&ema50),
        macd: last(&macd_line),
        rsi7: last(&rsi7),
        rsi14: last(&rsi14),
        atr14: last(&atr14),
        volume: last(&volumes),
        volume_ma: last(&volume_ma),
    };

    let prices = tail(&closes, n);
    TimeframeSeries {
        timeframe: timeframe.to_string(),
        data_points: prices.len(),
        prices,
        highs: tail(&highs, n),
        lows: tail(&lows, n),
        ema20: tail(&ema20, n),
        ema50: tail(&ema50, n),
        macd: tail(&macd_line, n),
        macd_signal: tail(&macd_signal, n),
        macd_hist: tail(&macd_hist, n),
        rsi7: tail(&rsi7, n),
        rsi14: tail(&rsi14, n),
        atr14: tail(&atr14, n),
        bb_upper: tail(&bb_upper, n),
        bb_middle: tail(&bb_middle, n),
        bb_lower: tail(&bb_lower, n),
        volumes: tail(&volumes, n),
        volume_ma: tail(&volume_ma, n),
        current,
    }
}

#[async_trait]
impl MarketDataSource for BinanceFutures {
    async fn snapshot(&self) -> Result<MarketSnapshot, String> {
        let klines_3m = self.fetch_klines("3m", 40).await?;
        let klines_15m = self.fetch_klines("15m", 40).await?;
        let klines_1h = self.fetch_klines("1h", 60).await?;
        let klines_4h = self.fetch_klines("4h", 60).await?;

        let closes_15m: Vec<f64> = klines_15m.iter().map(|k| k.close).collect();
        let closes_1h: Vec<f64> = klines_1h.iter().map(|k| k.close).collect();
        let closes_4h: Vec<f64> = klines_4h.iter().map(|k| k.close).collect();

        let timeframe_3m = build_series("3m", &klines_3m);
        let timeframe_15m = build_series("15m", &klines_15m);
        let timeframe_1h = build_series("1h", &klines_1h);
        let timeframe_4h = build_series("4h", &klines_4h);

        let open_interest = self.fetch_open_interest().await;
        let funding_rate = self.fetch_funding_rate().await;

        Ok(MarketSnapshot {
            symbol: self.symbol.clone(),
            current_price: timeframe_3m.current.price,
            price_changes: PriceChanges {
                m15: price_change_pct(&closes_15m, 1),
                h1: price_change_pct(&closes_1h, 1),
                h4: price_change_pct(&closes_4h, 1),
                h24: price_change_pct(&closes_1h, 24),
            },
            current_ema20: timeframe_3m.current.ema20,
            current_macd: timeframe_3m.current.macd,
            current_rsi7: timeframe_3m.current.rsi7,
            open_interest,
            funding_rate,
            timeframe_3m,
            timeframe_15m,
            timeframe_1h,
            timeframe_4h,
            timestamp: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synthetic_klines(n: usize) -> Vec<Kline> {
        (0..n)
            .map(|i| {
                let base = 100.0 + i as f64;
                Kline {
                    open: base,
                    high: base + 1.0,
                    low: base - 1.0,
                    close: base + 0.5,
                    volume: 1000.0 + i as f64 * 10.0,
                }
            })
            .collect()
    }

    #[test]
    fn test_build_series_trims_to_timeframe_points() {
        let series = build_series("3m", &synthetic_klines(40));
        assert_eq!(series.data_points, 30);
        assert_eq!(series.prices.len(), 30);
        assert_eq!(series.rsi14.len(), 30);
        assert_eq!(series.bb_upper.len(), 30);
    }

    #[test]
    fn test_build_series_current_values() {
        let klines = synthetic_klines(60);
        let series = build_series("4h", &klines);
        assert_eq!(series.current.price, klines[59].close);
        assert!(series.current.ema20 > 0.0);
        assert!(series.current.rsi14 > 50.0); // steadily rising series
        assert_eq!(series.ema_trend(), "up");
    }

    #[test]
    fn test_build_series_shorter_than_window() {
        // Fewer bars than the display window: series stay aligned and short.
        let series = build_series("15m", &synthetic_klines(10));
        assert_eq!(series.prices.len(), 10);
        assert_eq!(series.ema50.len(), 10);
        assert_eq!(series.current.ema50, 0.0); // not enough bars to warm up
    }
}
