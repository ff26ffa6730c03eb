use crate::domain::ports::chart_port::ChartProvider;
use async_trait::async_trait;
use serde_json::json;

/// Chart renderer backed by the chart-img.com TradingView endpoint.
pub struct ChartImgProvider {
    client: reqwest::Client,
    api_key: String,
    api_url: String,
    symbol: String,
    interval: String,
}

impl ChartImgProvider {
    pub fn new(api_key: String, api_url: String, symbol: String, interval: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            api_url,
            symbol,
            interval,
        }
    }
}

#[async_trait]
impl ChartProvider for ChartImgProvider {
    async fn render(&self) -> Result<Vec<u8>, String> {
        let payload = json!({
            "symbol": format!("BINANCE:{}", self.symbol),
            "interval": self.interval,
            "theme": "dark",
            "width": 800,
            "height": 600,
            "studies": [
                {"name": "Volume", "forceOverlay": true},
                {"name": "MACD"},
                {"name": "Relative Strength Index"}
            ]
        });

        let resp = self
            .client
            .post(&self.api_url)
            .header("x-api-key", &self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| format!("chart request failed: {e}"))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let detail = resp.text().await.unwrap_or_default();
            let preview: String = detail.chars().take(200).collect();
            return Err(format!("chart API returned {status}: {preview}"));
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| format!("chart body read failed: {e}"))?;
        Ok(bytes.to_vec())
    }
}
