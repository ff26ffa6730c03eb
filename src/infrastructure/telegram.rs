use crate::domain::ports::notifier_port::Notifier;
use async_trait::async_trait;
use serde_json::json;

/// Telegram bot notifier. Messages are sent with HTML formatting; if
/// Telegram rejects the markup, the same text is retried as plain text so
/// the report still reaches the operator.
pub struct TelegramNotifier {
    client: reqwest::Client,
    bot_token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(bot_token: String, chat_id: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            bot_token,
            chat_id,
        }
    }

    fn endpoint(&self, method: &str) -> String {
        format!("https://api.telegram.org/bot{}/{method}", self.bot_token)
    }

    async fn send_message(&self, text: &str, html: bool) -> Result<(), String> {
        let mut body = json!({
            "chat_id": self.chat_id,
            "text": text,
        });
        if html {
            body["parse_mode"] = json!("HTML");
        }

        let resp = self
            .client
            .post(self.endpoint("sendMessage"))
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("sendMessage request failed: {e}"))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let detail = resp.text().await.unwrap_or_default();
            return Err(format!("sendMessage returned {status}: {detail}"));
        }
        Ok(())
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send_text(&self, html: &str) -> Result<(), String> {
        match self.send_message(html, true).await {
            Ok(()) => Ok(()),
            Err(e) => {
                eprintln!("Warning: HTML message rejected ({e}), retrying as plain text");
                self.send_message(html, false).await
            }
        }
    }

    async fn send_photo(&self, caption: &str, png: &[u8]) -> Result<(), String> {
        let part = reqwest::multipart::Part::bytes(png.to_vec())
            .file_name("chart.png")
            .mime_str("image/png")
            .map_err(|e| format!("photo part: {e}"))?;
        let form = reqwest::multipart::Form::new()
            .text("chat_id", self.chat_id.clone())
            .text("caption", caption.to_string())
            .part("photo", part);

        let resp = self
            .client
            .post(self.endpoint("sendPhoto"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| format!("sendPhoto request failed: {e}"))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let detail = resp.text().await.unwrap_or_default();
            return Err(format!("sendPhoto returned {status}: {detail}"));
        }
        Ok(())
    }
}
