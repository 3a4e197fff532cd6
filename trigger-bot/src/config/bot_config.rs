//! BotConfig: BaseConfig + ServerConfig + guard policy. Use load() for env-based loading.

use anyhow::{Context, Result};
use guard_handlers::{GuardConfig, DEFAULT_RELEASE_KEYWORD};
use std::env;

use super::{BaseConfig, ServerConfig};

/// Bot config. Use BotConfig::load() for env-based loading.
pub struct BotConfig {
    pub base: BaseConfig,
    pub server: ServerConfig,
    pub guard: GuardConfig,
}

impl BotConfig {
    /// Load full config from environment variables. If `token` is provided it overrides BOT_TOKEN.
    /// Call validate() after load to check config before init.
    pub fn load(token: Option<String>) -> Result<Self> {
        let base = BaseConfig::load(token)?;
        let server = ServerConfig::from_env()?;
        let guard = guard_from_env()?;
        Ok(Self {
            base,
            server,
            guard,
        })
    }

    /// Validate config. Call after load() to fail fast before init.
    pub fn validate(&self) -> Result<()> {
        self.base.validate()?;
        self.server.validate()
    }

    pub fn base(&self) -> &BaseConfig {
        &self.base
    }
    pub fn server(&self) -> &ServerConfig {
        &self.server
    }
    pub fn guard(&self) -> &GuardConfig {
        &self.guard
    }

    pub fn bot_token(&self) -> &str {
        &self.base.bot_token
    }
    pub fn database_url(&self) -> &str {
        &self.base.database_url
    }
    pub fn log_file(&self) -> &str {
        &self.base.log_file
    }
    pub fn telegram_api_url(&self) -> Option<&str> {
        self.base.telegram_api_url.as_deref()
    }
    pub fn webhook_url(&self) -> Option<String> {
        self.server.webhook_url(&self.base.bot_token)
    }
}

/// SINGLE_CHAT_POLICY (default true) and RELEASE_KEYWORD (default `#exit`, empty disables).
fn guard_from_env() -> Result<GuardConfig> {
    let single_chat = match env::var("SINGLE_CHAT_POLICY") {
        Ok(s) => parse_bool(&s).with_context(|| format!("SINGLE_CHAT_POLICY must be true or false, got {}", s))?,
        Err(_) => true,
    };
    let release_keyword =
        env::var("RELEASE_KEYWORD").unwrap_or_else(|_| DEFAULT_RELEASE_KEYWORD.to_string());
    Ok(GuardConfig::new(single_chat, Some(release_keyword)))
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
