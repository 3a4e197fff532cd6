//! Shared fixtures: a recording bot and the webhook router assembled over an in-memory database.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use dbot_core::{Bot, Chat, DbotError, MemberRole, Message, Result};
use guard_handlers::GuardConfig;
use trigger_bot::{
    build_bot_components, build_handler_chain, build_router, AppState, BaseConfig, BotComponents,
    BotConfig, ServerConfig,
};

pub const TOKEN: &str = "test_bot_token_12345";
pub const ADMIN: i64 = 1;
pub const ALICE: i64 = 7;
pub const CHAT: i64 = -100;

/// Records replies and webhook registrations; roles default to `Member`.
#[derive(Default)]
pub struct MockBot {
    pub replies: Mutex<Vec<String>>,
    pub webhooks: Mutex<Vec<String>>,
    roles: Mutex<HashMap<(i64, i64), MemberRole>>,
    fail_webhook: bool,
}

impl MockBot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_webhook() -> Self {
        Self {
            fail_webhook: true,
            ..Self::default()
        }
    }

    pub fn set_role(&self, chat_id: i64, user_id: i64, role: MemberRole) {
        self.roles.lock().unwrap().insert((chat_id, user_id), role);
    }

    pub fn replies(&self) -> Vec<String> {
        self.replies.lock().unwrap().clone()
    }

    pub fn webhooks(&self) -> Vec<String> {
        self.webhooks.lock().unwrap().clone()
    }
}

#[async_trait]
impl Bot for MockBot {
    async fn send_message(&self, _chat: &Chat, text: &str) -> Result<()> {
        self.replies.lock().unwrap().push(text.to_string());
        Ok(())
    }

    async fn reply_to(&self, _message: &Message, text: &str) -> Result<()> {
        self.replies.lock().unwrap().push(text.to_string());
        Ok(())
    }

    async fn reply_html(&self, _chat_id: i64, _reply_to_message_id: &str, html: &str) -> Result<()> {
        self.replies.lock().unwrap().push(html.to_string());
        Ok(())
    }

    async fn member_role(&self, chat_id: i64, user_id: i64) -> Result<MemberRole> {
        Ok(self
            .roles
            .lock()
            .unwrap()
            .get(&(chat_id, user_id))
            .copied()
            .unwrap_or(MemberRole::Member))
    }

    async fn ban_member(&self, _chat_id: i64, _user_id: i64) -> Result<()> {
        Ok(())
    }

    async fn unban_member(&self, _chat_id: i64, _user_id: i64) -> Result<()> {
        Ok(())
    }

    async fn set_webhook(&self, url: &str) -> Result<()> {
        if self.fail_webhook {
            return Err(DbotError::Bot("Unauthorized".to_string()));
        }
        self.webhooks.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

pub fn test_config(base_url: Option<&str>) -> BotConfig {
    BotConfig {
        base: BaseConfig {
            bot_token: TOKEN.to_string(),
            telegram_api_url: None,
            log_file: "logs/trigger-bot-test.log".to_string(),
            database_url: "sqlite::memory:".to_string(),
        },
        server: ServerConfig {
            base_url: base_url.map(String::from),
            port: 3000,
        },
        guard: GuardConfig::default(),
    }
}

pub struct App {
    pub bot: Arc<MockBot>,
    pub components: BotComponents,
    pub router: Router,
}

impl App {
    pub async fn new(base_url: Option<&str>) -> Self {
        Self::with_bot(MockBot::new(), base_url).await
    }

    pub async fn with_bot(bot: MockBot, base_url: Option<&str>) -> Self {
        let config = test_config(base_url);
        let bot = Arc::new(bot);
        bot.set_role(CHAT, ADMIN, MemberRole::Owner);

        let core_bot: Arc<dyn Bot> = bot.clone();
        let components = build_bot_components(&config, core_bot)
            .await
            .expect("Failed to build components");
        let chain = build_handler_chain(&config, &components);

        let router = build_router(AppState {
            chain,
            bot: components.bot.clone(),
            scheduler: components.scheduler.clone(),
            token: Arc::from(TOKEN),
            webhook_url: config.webhook_url().map(Arc::from),
        });

        Self {
            bot,
            components,
            router,
        }
    }
}

/// Telegram `Update` JSON for a text message in the test supergroup.
pub fn text_update(update_id: i64, message_id: i64, user_id: i64, text: &str) -> String {
    serde_json::json!({
        "update_id": update_id,
        "message": {
            "message_id": message_id,
            "date": 1706529600,
            "chat": {"id": CHAT, "type": "supergroup", "title": "Harbor"},
            "from": {"id": user_id, "is_bot": false, "first_name": "Ada"},
            "text": text
        }
    })
    .to_string()
}
