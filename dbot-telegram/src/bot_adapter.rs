//! Wraps teloxide::Bot and implements [`dbot_core::Bot`]. Production code talks to Telegram through it;
//! tests substitute another Bot impl or point the API URL at a mock server.

use async_trait::async_trait;
use dbot_core::{parse_message_id, Bot as CoreBot, Chat, DbotError, MemberRole, Message, Result};
use teloxide::prelude::*;
use teloxide::types::{ChatId, MessageId, ParseMode, ReplyParameters, UserId};
use tracing::debug;

/// Thin wrapper around teloxide::Bot that implements dbot-core's Bot trait.
#[derive(Clone)]
pub struct TelegramBotAdapter {
    bot: teloxide::Bot,
}

impl TelegramBotAdapter {
    /// Creates an adapter from an existing teloxide Bot.
    pub fn new(bot: teloxide::Bot) -> Self {
        Self { bot }
    }

    /// Builds the teloxide Bot from a token and an optional custom API base URL.
    pub fn from_token(token: &str, api_url: Option<&str>) -> Result<Self> {
        let mut bot = teloxide::Bot::new(token);
        if let Some(url) = api_url {
            let url = reqwest::Url::parse(url)
                .map_err(|e| DbotError::Config(format!("Invalid Telegram API URL {}: {}", url, e)))?;
            bot = bot.set_api_url(url);
        }
        Ok(Self { bot })
    }

    /// Returns the underlying teloxide::Bot for direct API use when needed.
    pub fn inner(&self) -> &teloxide::Bot {
        &self.bot
    }
}

fn bot_error(e: teloxide::RequestError) -> DbotError {
    DbotError::Bot(e.to_string())
}

fn user_id(id: i64) -> UserId {
    UserId(id as u64)
}

#[async_trait]
impl CoreBot for TelegramBotAdapter {
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()> {
        self.bot
            .send_message(ChatId(chat.id), text.to_string())
            .await
            .map_err(bot_error)?;
        Ok(())
    }

    async fn reply_to(&self, message: &Message, text: &str) -> Result<()> {
        let id = parse_message_id(&message.id)?;
        self.bot
            .send_message(ChatId(message.chat.id), text.to_string())
            .reply_parameters(ReplyParameters::new(MessageId(id)).allow_sending_without_reply())
            .await
            .map_err(bot_error)?;
        Ok(())
    }

    async fn reply_html(&self, chat_id: i64, reply_to_message_id: &str, html: &str) -> Result<()> {
        let id = parse_message_id(reply_to_message_id)?;
        self.bot
            .send_message(ChatId(chat_id), html.to_string())
            .parse_mode(ParseMode::Html)
            .reply_parameters(ReplyParameters::new(MessageId(id)).allow_sending_without_reply())
            .await
            .map_err(bot_error)?;
        Ok(())
    }

    async fn member_role(&self, chat_id: i64, user: i64) -> Result<MemberRole> {
        let member = self
            .bot
            .get_chat_member(ChatId(chat_id), user_id(user))
            .await
            .map_err(bot_error)?;

        let kind = &member.kind;
        let role = if kind.is_owner() {
            MemberRole::Owner
        } else if kind.is_administrator() {
            MemberRole::Administrator
        } else if kind.is_banned() {
            MemberRole::Banned
        } else if kind.is_left() {
            MemberRole::Left
        } else if kind.is_restricted() {
            MemberRole::Restricted
        } else {
            MemberRole::Member
        };
        debug!(chat_id = chat_id, user_id = user, role = ?role, "Resolved member role");
        Ok(role)
    }

    async fn ban_member(&self, chat_id: i64, user: i64) -> Result<()> {
        self.bot
            .ban_chat_member(ChatId(chat_id), user_id(user))
            .await
            .map_err(bot_error)?;
        Ok(())
    }

    async fn unban_member(&self, chat_id: i64, user: i64) -> Result<()> {
        self.bot
            .unban_chat_member(ChatId(chat_id), user_id(user))
            .only_if_banned(true)
            .await
            .map_err(bot_error)?;
        Ok(())
    }

    async fn set_webhook(&self, url: &str) -> Result<()> {
        let url = reqwest::Url::parse(url)
            .map_err(|e| DbotError::Config(format!("Invalid webhook URL {}: {}", url, e)))?;
        self.bot.set_webhook(url).await.map_err(bot_error)?;
        Ok(())
    }
}
