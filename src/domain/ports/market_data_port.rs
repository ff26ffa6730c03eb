use crate::domain::entities::market_snapshot::MarketSnapshot;

/// Source of multi-timeframe market data for one instrument.
#[async_trait::async_trait]
pub trait MarketDataSource: Send + Sync {
    async fn snapshot(&self) -> Result<MarketSnapshot, String>;
}
