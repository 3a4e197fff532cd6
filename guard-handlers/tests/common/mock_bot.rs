//! Recording implementation of [`dbot_core::Bot`] for guard tests.
//!
//! Every platform call is appended to a log so tests can assert on kicks, notices and
//! delayed replies without hitting Telegram. Roles default to `Member`.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use dbot_core::{Bot, Chat, DbotError, MemberRole, Message, Result};

/// One recorded platform call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCall {
    Send { chat_id: i64, text: String },
    Reply { chat_id: i64, message_id: String, text: String },
    ReplyHtml { chat_id: i64, message_id: String, html: String },
    Ban { chat_id: i64, user_id: i64 },
    Unban { chat_id: i64, user_id: i64 },
    SetWebhook { url: String },
}

#[derive(Default)]
pub struct MockBot {
    calls: Mutex<Vec<BotCall>>,
    roles: Mutex<HashMap<(i64, i64), MemberRole>>,
    failing_bans: Mutex<HashSet<i64>>,
}

impl MockBot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_role(&self, chat_id: i64, user_id: i64, role: MemberRole) {
        self.roles.lock().unwrap().insert((chat_id, user_id), role);
    }

    /// Makes `ban_member` fail in the given chat (e.g. missing rights).
    pub fn fail_bans_in(&self, chat_id: i64) {
        self.failing_bans.lock().unwrap().insert(chat_id);
    }

    pub fn calls(&self) -> Vec<BotCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Chats the user was kicked from (ban followed by unban).
    pub fn kicked_from(&self, user_id: i64) -> Vec<i64> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                BotCall::Unban { chat_id, user_id: u } if u == user_id => Some(chat_id),
                _ => None,
            })
            .collect()
    }

    pub fn html_replies(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                BotCall::ReplyHtml { html, .. } => Some(html),
                _ => None,
            })
            .collect()
    }

    pub fn text_replies(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                BotCall::Reply { text, .. } | BotCall::Send { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: BotCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl Bot for MockBot {
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()> {
        self.record(BotCall::Send {
            chat_id: chat.id,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn reply_to(&self, message: &Message, text: &str) -> Result<()> {
        self.record(BotCall::Reply {
            chat_id: message.chat.id,
            message_id: message.id.clone(),
            text: text.to_string(),
        });
        Ok(())
    }

    async fn reply_html(&self, chat_id: i64, reply_to_message_id: &str, html: &str) -> Result<()> {
        self.record(BotCall::ReplyHtml {
            chat_id,
            message_id: reply_to_message_id.to_string(),
            html: html.to_string(),
        });
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

    async fn ban_member(&self, chat_id: i64, user_id: i64) -> Result<()> {
        if self.failing_bans.lock().unwrap().contains(&chat_id) {
            return Err(DbotError::Bot("not enough rights".to_string()));
        }
        self.record(BotCall::Ban { chat_id, user_id });
        Ok(())
    }

    async fn unban_member(&self, chat_id: i64, user_id: i64) -> Result<()> {
        self.record(BotCall::Unban { chat_id, user_id });
        Ok(())
    }

    async fn set_webhook(&self, url: &str) -> Result<()> {
        self.record(BotCall::SetWebhook {
            url: url.to_string(),
        });
        Ok(())
    }
}
