//! Join policy: members who arrive while they belong to another chat are kicked right away.

use std::sync::Arc;

use async_trait::async_trait;
use dbot_core::{Bot, Handler, HandlerResponse, Message, Result};
use storage::{Claim, PresenceRepository};
use tracing::{debug, info, instrument, warn};

use crate::config::GuardConfig;
use crate::moderation::{is_admin, kick};
use crate::{db_error, messages};

pub struct JoinHandler {
    bot: Arc<dyn Bot>,
    presence: PresenceRepository,
    config: GuardConfig,
}

impl JoinHandler {
    pub fn new(bot: Arc<dyn Bot>, presence: PresenceRepository, config: GuardConfig) -> Self {
        Self {
            bot,
            presence,
            config,
        }
    }
}

#[async_trait]
impl Handler for JoinHandler {
    #[instrument(skip(self, message))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        if message.message_type != "new_chat_members" {
            return Ok(HandlerResponse::Continue);
        }
        if !message.chat.is_group() {
            return Ok(HandlerResponse::Stop);
        }

        let chat_id = message.chat.id;
        for member in message.new_chat_members.iter().filter(|m| !m.is_bot) {
            if is_admin(self.bot.as_ref(), chat_id, member.id).await {
                debug!(user_id = member.id, chat_id = chat_id, "Admin joined; not recorded");
                continue;
            }

            let claim = self
                .presence
                .claim(member.id, chat_id, self.config.single_chat)
                .await
                .map_err(db_error)?;

            match claim {
                Claim::Rejected { anchor_chat_id } => {
                    info!(
                        user_id = member.id,
                        chat_id = chat_id,
                        anchor_chat_id = anchor_chat_id,
                        "step: joining member belongs to another chat, ejecting"
                    );
                    kick(self.bot.as_ref(), chat_id, member.id).await;
                    let notice = messages::kicked_elsewhere(member);
                    if let Err(e) = self.bot.send_message(&message.chat, &notice).await {
                        warn!(error = %e, chat_id = chat_id, "Failed to send join notice");
                    }
                }
                Claim::Admitted { .. } => {
                    info!(user_id = member.id, chat_id = chat_id, "Recorded joining member");
                }
                Claim::Quarantined { .. } => {
                    debug!(user_id = member.id, chat_id = chat_id, "Member rejoined quarantine chat");
                }
            }
        }

        Ok(HandlerResponse::Stop)
    }
}
