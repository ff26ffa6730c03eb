/// Outbound chat channel for formatted cycle reports.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    /// Send an HTML-formatted message.
    async fn send_text(&self, html: &str) -> Result<(), String>;

    /// Send an image with a short plain-text caption.
    async fn send_photo(&self, caption: &str, png: &[u8]) -> Result<(), String>;
}
