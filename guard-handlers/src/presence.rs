//! Presence policy for ordinary group messages.
//!
//! Decides, before any trigger runs, whether the sender may speak in this chat:
//! quarantined users are held to their quarantine chat, anchored users to their anchor
//! (when the single-chat policy is on), and everyone else gets their membership recorded.

use std::sync::Arc;

use async_trait::async_trait;
use dbot_core::{Bot, Handler, HandlerResponse, Message, Result};
use storage::{contains_keyword, Claim, PresenceRepository, PresenceState};
use tracing::{debug, info, instrument, warn};

use crate::config::GuardConfig;
use crate::moderation::{is_admin, kick};
use crate::{db_error, messages};

pub struct PresenceHandler {
    bot: Arc<dyn Bot>,
    presence: PresenceRepository,
    config: GuardConfig,
}

impl PresenceHandler {
    pub fn new(bot: Arc<dyn Bot>, presence: PresenceRepository, config: GuardConfig) -> Self {
        Self {
            bot,
            presence,
            config,
        }
    }

    /// Kicks the sender from this chat and posts a notice. The message is not processed further.
    async fn eject(&self, message: &Message, anchor_chat_id: i64) -> HandlerResponse {
        info!(
            user_id = message.user.id,
            chat_id = message.chat.id,
            anchor_chat_id = anchor_chat_id,
            "step: sender belongs to another chat, ejecting"
        );
        kick(self.bot.as_ref(), message.chat.id, message.user.id).await;
        let notice = messages::kicked_elsewhere(&message.user);
        if let Err(e) = self.bot.reply_to(message, &notice).await {
            warn!(error = %e, chat_id = message.chat.id, "Failed to send eject notice");
        }
        HandlerResponse::Reply(notice)
    }
}

/// Messages the presence policy applies to: human text in a group, not a command.
pub(crate) fn is_guarded(message: &Message) -> bool {
    message.message_type == "text"
        && message.chat.is_group()
        && !message.is_command()
        && !message.user.is_bot
        && message.user.id != 0
}

#[async_trait]
impl Handler for PresenceHandler {
    #[instrument(skip(self, message))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        if !is_guarded(message) {
            return Ok(HandlerResponse::Continue);
        }

        let user_id = message.user.id;
        let chat_id = message.chat.id;

        if is_admin(self.bot.as_ref(), chat_id, user_id).await {
            debug!(user_id = user_id, chat_id = chat_id, "Admin exempt from presence policy");
            return Ok(HandlerResponse::Continue);
        }

        let state = self.presence.state(user_id).await.map_err(db_error)?;

        if let PresenceState::Quarantined {
            chat_id: quarantine_chat,
            exit_keyword,
        } = &state
        {
            if *quarantine_chat == chat_id && contains_keyword(&message.content, exit_keyword) {
                self.presence.release(user_id).await.map_err(db_error)?;
                info!(user_id = user_id, chat_id = chat_id, "step: exit keyword seen, quarantine lifted");
                return Ok(HandlerResponse::Continue);
            }
        } else if let Some(release) = &self.config.release_keyword {
            if contains_keyword(&message.content, release) {
                let released = self.presence.release(user_id).await.map_err(db_error)?;
                info!(user_id = user_id, chat_id = chat_id, released = released, "step: release keyword seen");
                if let Err(e) = self.bot.reply_to(message, messages::RELEASED).await {
                    warn!(error = %e, chat_id = chat_id, "Failed to acknowledge release");
                }
                return Ok(HandlerResponse::Reply(messages::RELEASED.to_string()));
            }
        }

        let claim = self
            .presence
            .claim(user_id, chat_id, self.config.single_chat)
            .await
            .map_err(db_error)?;

        match claim {
            Claim::Rejected { anchor_chat_id } => Ok(self.eject(message, anchor_chat_id).await),
            Claim::Admitted { first_seen } => {
                if first_seen {
                    info!(user_id = user_id, chat_id = chat_id, "Recorded membership");
                }
                Ok(HandlerResponse::Continue)
            }
            Claim::Quarantined { .. } => Ok(HandlerResponse::Continue),
        }
    }
}
