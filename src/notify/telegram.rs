use anyhow::{Context, Result};
use metrics::counter;
use reqwest::Client;

use super::Notifier;

const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Telegram Bot API `sendMessage`, plain text.
#[derive(Clone)]
pub struct TelegramNotifier {
    token: String,
    chat_id: String,
    api_base: String,
    client: Client,
}

impl TelegramNotifier {
    pub fn new(token: String, chat_id: String, client: Client) -> Self {
        Self {
            token,
            chat_id,
            api_base: DEFAULT_API_BASE.to_string(),
            client,
        }
    }

    /// Point at another Bot API host (self-hosted server, local stub).
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_base, self.token)
    }
}

#[async_trait::async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<()> {
        let body = serde_json::json!({
            "chat_id": self.chat_id,
            "text": text,
            "disable_web_page_preview": false,
        });

        // The token is part of the url; keep it out of error messages.
        self.client
            .post(self.endpoint())
            .json(&body)
            .send()
            .await
            .map_err(|e| e.without_url())
            .context("telegram post")?
            .error_for_status()
            .map_err(|e| e.without_url())
            .context("telegram non-2xx")?;

        counter!("notify_sent_total").increment(1);
        tracing::debug!(chars = text.chars().count(), "telegram message sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_embeds_token_and_trims_base() {
        let n = TelegramNotifier::new("123:abc".into(), "42".into(), Client::new())
            .with_api_base("http://127.0.0.1:9/");
        assert_eq!(n.endpoint(), "http://127.0.0.1:9/bot123:abc/sendMessage");
    }
}
