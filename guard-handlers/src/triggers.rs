//! Keyword triggers: the first registered keyword found in a message schedules a delayed reply.
//!
//! A quarantine-entry trigger also pins the sender to this chat and kicks them from every
//! other chat they were recorded in. Admins and bots are never quarantined.

use std::sync::Arc;

use async_trait::async_trait;
use dbot_core::{Bot, Handler, HandlerResponse, Message, Result};
use storage::{PresenceRepository, Trigger, TriggerKind, TriggerRepository};
use tracing::{info, instrument, warn};

use crate::moderation::{is_admin, kick};
use crate::presence::is_guarded;
use crate::scheduler::ReplyScheduler;
use crate::{db_error, messages};

pub struct TriggerHandler {
    bot: Arc<dyn Bot>,
    triggers: TriggerRepository,
    presence: PresenceRepository,
    scheduler: ReplyScheduler,
}

impl TriggerHandler {
    pub fn new(
        bot: Arc<dyn Bot>,
        triggers: TriggerRepository,
        presence: PresenceRepository,
        scheduler: ReplyScheduler,
    ) -> Self {
        Self {
            bot,
            triggers,
            presence,
            scheduler,
        }
    }

    async fn enter_quarantine(&self, message: &Message, trigger: &Trigger) -> Result<()> {
        let exit_keyword = match trigger.exit_keyword.as_deref().map(str::trim) {
            Some(exit) if !exit.is_empty() => exit,
            _ => {
                warn!(
                    chat_id = trigger.chat_id,
                    keyword = %trigger.keyword,
                    "Quarantine trigger has no exit keyword; replying only"
                );
                return Ok(());
            }
        };

        let user_id = message.user.id;
        if !is_guarded(message) || is_admin(self.bot.as_ref(), message.chat.id, user_id).await {
            info!(user_id = user_id, chat_id = message.chat.id, "Sender exempt from quarantine");
            return Ok(());
        }

        let dropped = self
            .presence
            .enter_quarantine(user_id, message.chat.id, exit_keyword)
            .await
            .map_err(db_error)?;

        match dropped {
            Some(chats) => {
                info!(
                    user_id = user_id,
                    chat_id = message.chat.id,
                    other_chats = chats.len(),
                    "step: quarantine entered"
                );
                for chat_id in chats {
                    kick(self.bot.as_ref(), chat_id, user_id).await;
                }
            }
            None => info!(user_id = user_id, "Already quarantined; state unchanged"),
        }
        Ok(())
    }
}

#[async_trait]
impl Handler for TriggerHandler {
    #[instrument(skip(self, message))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        if message.message_type != "text" || message.is_command() || message.content.is_empty() {
            return Ok(HandlerResponse::Continue);
        }

        let Some(trigger) = self
            .triggers
            .find_match(message.chat.id, &message.content)
            .await
            .map_err(db_error)?
        else {
            return Ok(HandlerResponse::Continue);
        };

        info!(
            user_id = message.user.id,
            chat_id = message.chat.id,
            keyword = %trigger.keyword,
            kind = %trigger.kind,
            "step: trigger matched"
        );

        if trigger.kind == TriggerKind::QuarantineEntry {
            self.enter_quarantine(message, &trigger).await?;
        }

        let body = if trigger.payload.trim().is_empty() {
            messages::default_reply(&message.user, message.chat.title.as_deref(), trigger.delay_secs)
        } else {
            trigger.payload.clone()
        };
        self.scheduler
            .schedule(message.chat.id, message.id.clone(), body, trigger.delay());

        let ack = messages::acknowledgement(trigger.delay_secs);
        if let Err(e) = self.bot.reply_to(message, &ack).await {
            warn!(error = %e, chat_id = message.chat.id, "Failed to send acknowledgement");
        }
        Ok(HandlerResponse::Reply(ack))
    }
}
