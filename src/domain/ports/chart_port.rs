/// Renders a chart image for the monitored symbol.
#[async_trait::async_trait]
pub trait ChartProvider: Send + Sync {
    /// Returns PNG bytes.
    async fn render(&self) -> Result<Vec<u8>, String>;
}
