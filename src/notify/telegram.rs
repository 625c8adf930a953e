use crate::notify::Notifier;
use crate::{Error, Result};
use reqwest::blocking::Client;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct TelegramConfig {
    pub base_url: String,
    pub bot_token: String,
    pub chat_id: String,
    pub timeout_secs: u64,
}

pub struct TelegramNotifier {
    client: Client,
    config: TelegramConfig,
}

impl TelegramNotifier {
    // bot_token and chat_id are deliberately not checked here; a missing
    // credential surfaces as a delivery failure.
    pub fn new(config: TelegramConfig) -> Result<Self> {
        if config.base_url.trim().is_empty() {
            return Err(Error::config("base_url must be set"));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .map_err(|err| Error::transport(format!("http client build failed: {err}")))?;
        Ok(Self { client, config })
    }
}

impl Notifier for TelegramNotifier {
    // Fire-and-forget: the response status is not inspected.
    fn send(&self, text: &str) -> Result<()> {
        let url = format!(
            "{}/bot{}/sendMessage",
            self.config.base_url, self.config.bot_token
        );
        let params = [
            ("chat_id", self.config.chat_id.as_str()),
            ("text", text),
        ];
        self.client
            .post(url)
            .form(&params)
            .send()
            .map_err(|err| Error::transport(format!("telegram send failed: {err}")))?;
        Ok(())
    }
}
