//! Adapters from Telegram (teloxide) types to dbot_core types.
//! Depends only on teloxide and dbot_core type definitions.

use dbot_core::{Chat, Message, MessageDirection, ToCoreMessage, ToCoreUser, User};
use teloxide::types::MessageKind;

/// Wraps a teloxide User for conversion to core [`User`].
pub struct TelegramUserWrapper<'a>(pub &'a teloxide::types::User);

impl<'a> ToCoreUser for TelegramUserWrapper<'a> {
    fn to_core(&self) -> User {
        User {
            id: self.0.id.0 as i64,
            username: self.0.username.clone(),
            first_name: Some(self.0.first_name.clone()),
            last_name: self.0.last_name.clone(),
            is_bot: self.0.is_bot,
        }
    }
}

/// Wraps a teloxide Message for conversion to core [`Message`].
///
/// `message_type` is `new_chat_members` for joins (with the joining users listed), `text` when the
/// message carries text or a caption, `media` for other user content (stickers, captionless photos)
/// and `service` for the remaining service messages (left member, pins, title changes).
pub struct TelegramMessageWrapper<'a>(pub &'a teloxide::types::Message);

impl<'a> ToCoreMessage for TelegramMessageWrapper<'a> {
    fn to_core(&self) -> Message {
        let new_chat_members: Vec<User> = self
            .0
            .new_chat_members()
            .map(|members| {
                members
                    .iter()
                    .map(|u| TelegramUserWrapper(u).to_core())
                    .collect()
            })
            .unwrap_or_default();

        let message_type = if !new_chat_members.is_empty() {
            "new_chat_members"
        } else if self.0.text().or_else(|| self.0.caption()).is_some() {
            "text"
        } else if matches!(self.0.kind, MessageKind::Common(_)) {
            "media"
        } else {
            "service"
        };

        Message {
            id: self.0.id.0.to_string(),
            user: self
                .0
                .from
                .as_ref()
                .map(|u| TelegramUserWrapper(u).to_core())
                .unwrap_or_else(|| User {
                    id: 0,
                    username: None,
                    first_name: None,
                    last_name: None,
                    is_bot: false,
                }),
            chat: Chat {
                id: self.0.chat.id.0,
                chat_type: self.chat_type().to_string(),
                title: self.0.chat.title().map(str::to_string),
            },
            content: self
                .0
                .text()
                .or_else(|| self.0.caption())
                .unwrap_or("")
                .to_string(),
            message_type: message_type.to_string(),
            direction: MessageDirection::Incoming,
            created_at: self.0.date,
            new_chat_members,
        }
    }
}

impl<'a> TelegramMessageWrapper<'a> {
    fn chat_type(&self) -> &'static str {
        let chat = &self.0.chat;
        if chat.is_private() {
            "private"
        } else if chat.is_supergroup() {
            "supergroup"
        } else if chat.is_group() {
            "group"
        } else if chat.is_channel() {
            "channel"
        } else {
            "unknown"
        }
    }
}
