//! Chat-platform contract.
//!
//! [`Bot`] is transport-agnostic; dbot-telegram implements it via teloxide and tests substitute a
//! recording mock. Every call the guard logic makes to the platform goes through this trait.

use crate::error::{DbotError, Result};
use crate::types::{Chat, MemberRole, Message};
use async_trait::async_trait;

/// Abstraction over the chat platform: messaging, member role lookup, ban/unban and webhook registration.
#[async_trait]
pub trait Bot: Send + Sync {
    /// Sends a plain text message to the given chat.
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()>;
    /// Sends a plain text reply quoting the given message.
    async fn reply_to(&self, message: &Message, text: &str) -> Result<()>;
    /// Sends an HTML-formatted reply to `reply_to_message_id` in `chat_id`. Used for delayed trigger replies,
    /// which outlive the originating [`Message`].
    async fn reply_html(&self, chat_id: i64, reply_to_message_id: &str, html: &str) -> Result<()>;
    /// Returns the role of `user_id` in `chat_id`.
    async fn member_role(&self, chat_id: i64, user_id: i64) -> Result<MemberRole>;
    /// Bans `user_id` from `chat_id`.
    async fn ban_member(&self, chat_id: i64, user_id: i64) -> Result<()>;
    /// Lifts a ban so the user can rejoin.
    async fn unban_member(&self, chat_id: i64, user_id: i64) -> Result<()>;
    /// Registers `url` as the platform's webhook target.
    async fn set_webhook(&self, url: &str) -> Result<()>;
}

/// Parses a message id string into an i32 (Telegram message ids are 32-bit).
pub fn parse_message_id(s: &str) -> Result<i32> {
    s.parse()
        .map_err(|_| DbotError::Bot(format!("Invalid message_id: {}", s)))
}
