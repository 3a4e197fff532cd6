//! Shared fixtures: an in-memory guard wired the same way the application wires it.

#![allow(dead_code)]

pub mod mock_bot;

use std::sync::Arc;

use chrono::Utc;
use dbot_core::{Bot, Chat, HandlerResponse, Message, MessageDirection, User};
use guard_handlers::{
    CommandHandler, GuardConfig, JoinHandler, LoggingHandler, PresenceHandler, ReplyScheduler,
    TriggerHandler,
};
use handler_chain::HandlerChain;
use storage::{PresenceRepository, SqlitePoolManager, TriggerRepository};

pub use mock_bot::{BotCall, MockBot};

pub const ADMIN: i64 = 1;
pub const ALICE: i64 = 7;
pub const BOB: i64 = 8;
pub const CHAT_A: i64 = -100;
pub const CHAT_B: i64 = -200;
pub const CHAT_C: i64 = -300;

pub struct Guard {
    pub bot: Arc<MockBot>,
    pub triggers: TriggerRepository,
    pub presence: PresenceRepository,
    pub scheduler: ReplyScheduler,
    pub chain: HandlerChain,
}

impl Guard {
    pub async fn new() -> Self {
        Self::with_config(GuardConfig::default()).await
    }

    pub async fn with_config(config: GuardConfig) -> Self {
        let pool = SqlitePoolManager::new("sqlite::memory:")
            .await
            .expect("Failed to create pool");
        let triggers = TriggerRepository::new(pool.clone())
            .await
            .expect("Failed to create trigger repository");
        let presence = PresenceRepository::new(pool)
            .await
            .expect("Failed to create presence repository");

        let bot = Arc::new(MockBot::new());
        for chat in [CHAT_A, CHAT_B, CHAT_C] {
            bot.set_role(chat, ADMIN, dbot_core::MemberRole::Administrator);
        }
        let core_bot: Arc<dyn Bot> = bot.clone();
        let scheduler = ReplyScheduler::new(core_bot.clone());

        let chain = HandlerChain::new()
            .add_handler(Arc::new(LoggingHandler))
            .add_handler(Arc::new(CommandHandler::new(core_bot.clone(), triggers.clone())))
            .add_handler(Arc::new(JoinHandler::new(
                core_bot.clone(),
                presence.clone(),
                config.clone(),
            )))
            .add_handler(Arc::new(PresenceHandler::new(
                core_bot.clone(),
                presence.clone(),
                config,
            )))
            .add_handler(Arc::new(TriggerHandler::new(
                core_bot,
                triggers.clone(),
                presence.clone(),
                scheduler.clone(),
            )));

        Self {
            bot,
            triggers,
            presence,
            scheduler,
            chain,
        }
    }

    /// Sends a text from `user_id` in `chat_id` through the chain.
    pub async fn say(&self, user_id: i64, chat_id: i64, text: &str) -> HandlerResponse {
        self.chain
            .handle(&text_message(user_id, chat_id, text))
            .await
            .expect("chain failed")
    }

    pub async fn post(&self, message: &Message) -> HandlerResponse {
        self.chain.handle(message).await.expect("chain failed")
    }

    pub async fn join(&self, chat_id: i64, members: &[i64]) -> HandlerResponse {
        self.chain
            .handle(&join_message(chat_id, members))
            .await
            .expect("chain failed")
    }
}

pub fn user(id: i64) -> User {
    User {
        id,
        username: Some(format!("user{}", id)),
        first_name: Some(format!("Player{}", id)),
        last_name: None,
        is_bot: false,
    }
}

pub fn group(id: i64) -> Chat {
    Chat {
        id,
        chat_type: "supergroup".to_string(),
        title: Some(format!("Zone{}", -id)),
    }
}

pub fn text_message(user_id: i64, chat_id: i64, text: &str) -> Message {
    Message {
        id: "42".to_string(),
        user: user(user_id),
        chat: group(chat_id),
        content: text.to_string(),
        message_type: "text".to_string(),
        direction: MessageDirection::Incoming,
        created_at: Utc::now(),
        new_chat_members: vec![],
    }
}

/// A non-text message (`media` or `service`) with no content.
pub fn contentless_message(user_id: i64, chat_id: i64, message_type: &str) -> Message {
    Message {
        message_type: message_type.to_string(),
        ..text_message(user_id, chat_id, "")
    }
}

pub fn join_message(chat_id: i64, members: &[i64]) -> Message {
    let new_chat_members: Vec<User> = members.iter().map(|id| user(*id)).collect();
    Message {
        id: "43".to_string(),
        user: new_chat_members.first().cloned().unwrap_or_else(|| user(0)),
        chat: group(chat_id),
        content: String::new(),
        message_type: "new_chat_members".to_string(),
        direction: MessageDirection::Incoming,
        created_at: Utc::now(),
        new_chat_members,
    }
}
