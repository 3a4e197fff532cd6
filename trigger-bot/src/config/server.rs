//! Webhook server config: public base URL and listen port.

use anyhow::{Context, Result};
use std::env;

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// BASE_URL, e.g. `https://bot.example.com`; required for webhook registration
    pub base_url: Option<String>,
    /// PORT
    pub port: u16,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        let base_url = env::var("BASE_URL")
            .ok()
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty());
        let port = match env::var("PORT") {
            Ok(s) => s
                .trim()
                .parse()
                .with_context(|| format!("PORT is not a valid port number: {}", s))?,
            Err(_) => DEFAULT_PORT,
        };
        Ok(Self { base_url, port })
    }

    /// Public URL Telegram should post updates to: `<BASE_URL>/webhook/<token>`.
    pub fn webhook_url(&self, bot_token: &str) -> Option<String> {
        self.base_url
            .as_ref()
            .map(|base| format!("{}/webhook/{}", base, bot_token))
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(ref url_str) = self.base_url {
            match reqwest::Url::parse(url_str) {
                Ok(url) if url.scheme() == "https" || url.scheme() == "http" => {}
                _ => anyhow::bail!("BASE_URL is set but not a valid http(s) URL: {}", url_str),
            }
        }
        Ok(())
    }
}
