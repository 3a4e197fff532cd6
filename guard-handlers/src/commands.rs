//! Admin commands: parsing and the handler that executes them.
//!
//! Every `/`-prefixed text ends the chain here, whether or not it is a known command.

use std::sync::Arc;

use async_trait::async_trait;
use dbot_core::{Bot, Handler, HandlerError, HandlerResponse, Message, Result};
use storage::{NewTrigger, TriggerKind, TriggerRepository};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::db_error;
use crate::messages;
use crate::moderation::is_admin;

const SET_USAGE: &str = "Usage: /set <keyword> <delay_seconds> [reply text]";
const SETQ_USAGE: &str = "Usage: /setq <keyword> <delay_seconds> <exit_keyword> [reply text]";
const SETEXIT_USAGE: &str = "Usage: /setexit <keyword> <delay_seconds> [reply text]";
const REMOVE_USAGE: &str = "Usage: /remove <keyword>";

/// Why an admin command could not be parsed. The display text is sent back to the admin.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandParseError {
    #[error("{0}")]
    Usage(&'static str),
    #[error("delay_seconds must be a whole number of seconds, got {0:?}")]
    InvalidDelay(String),
}

impl From<CommandParseError> for HandlerError {
    fn from(e: CommandParseError) -> Self {
        HandlerError::InvalidCommand(e.to_string())
    }
}

/// A parsed bot command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminCommand {
    Start,
    Set {
        keyword: String,
        delay_secs: u32,
        payload: String,
    },
    SetQuarantine {
        keyword: String,
        delay_secs: u32,
        exit_keyword: String,
        payload: String,
    },
    SetExit {
        keyword: String,
        delay_secs: u32,
        payload: String,
    },
    List,
    Remove {
        keyword: String,
    },
    Clear,
}

impl AdminCommand {
    /// Parses a `/command args…` text. `Ok(None)` means the command is not one of ours.
    ///
    /// A `@botname` suffix on the command word is ignored. Reply text keeps its original spacing.
    pub fn parse(text: &str) -> std::result::Result<Option<Self>, CommandParseError> {
        let (word, rest) = next_token(text.trim_start());
        let Some(word) = word.strip_prefix('/') else {
            return Ok(None);
        };
        let name = word.split('@').next().unwrap_or_default().to_lowercase();

        let command = match name.as_str() {
            "start" => AdminCommand::Start,
            "set" => {
                let (keyword, delay_secs, payload) = parse_trigger_args(rest, SET_USAGE)?;
                AdminCommand::Set {
                    keyword,
                    delay_secs,
                    payload,
                }
            }
            "setq" => {
                let (keyword, delay_secs, rest) = parse_trigger_args(rest, SETQ_USAGE)?;
                let (exit_keyword, payload) = next_token(&rest);
                if exit_keyword.is_empty() {
                    return Err(CommandParseError::Usage(SETQ_USAGE));
                }
                AdminCommand::SetQuarantine {
                    keyword,
                    delay_secs,
                    exit_keyword: exit_keyword.to_string(),
                    payload: payload.trim().to_string(),
                }
            }
            "setexit" => {
                let (keyword, delay_secs, payload) = parse_trigger_args(rest, SETEXIT_USAGE)?;
                AdminCommand::SetExit {
                    keyword,
                    delay_secs,
                    payload,
                }
            }
            "list" => AdminCommand::List,
            "remove" => {
                let (keyword, extra) = next_token(rest);
                if keyword.is_empty() || !extra.trim().is_empty() {
                    return Err(CommandParseError::Usage(REMOVE_USAGE));
                }
                AdminCommand::Remove {
                    keyword: keyword.to_string(),
                }
            }
            "clear" | "clearall" => AdminCommand::Clear,
            _ => return Ok(None),
        };
        Ok(Some(command))
    }
}

/// Splits off the first whitespace-delimited token; returns (token, remainder starting after it).
fn next_token(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.find(char::is_whitespace) {
        Some(idx) => (&s[..idx], &s[idx..]),
        None => (s, ""),
    }
}

/// `<keyword> <delay> [rest]` shared by /set, /setq and /setexit.
fn parse_trigger_args(
    args: &str,
    usage: &'static str,
) -> std::result::Result<(String, u32, String), CommandParseError> {
    let (keyword, rest) = next_token(args);
    let (delay, rest) = next_token(rest);
    if keyword.is_empty() || delay.is_empty() {
        return Err(CommandParseError::Usage(usage));
    }
    let delay_secs = delay
        .parse::<u32>()
        .map_err(|_| CommandParseError::InvalidDelay(delay.to_string()))?;
    Ok((keyword.to_string(), delay_secs, rest.trim().to_string()))
}

/// Executes admin commands. Trigger management is restricted to group owners and admins.
pub struct CommandHandler {
    bot: Arc<dyn Bot>,
    triggers: TriggerRepository,
}

impl CommandHandler {
    pub fn new(bot: Arc<dyn Bot>, triggers: TriggerRepository) -> Self {
        Self { bot, triggers }
    }

    /// Trigger management needs a group chat and an owner or admin sender.
    async fn check_access(&self, message: &Message) -> std::result::Result<(), HandlerError> {
        if !message.chat.is_group() {
            return Err(HandlerError::GroupOnly);
        }
        if !is_admin(self.bot.as_ref(), message.chat.id, message.user.id).await {
            return Err(HandlerError::Unauthorized);
        }
        Ok(())
    }

    async fn reply(&self, message: &Message, text: &str) -> HandlerResponse {
        if let Err(e) = self.bot.reply_to(message, text).await {
            warn!(error = %e, chat_id = message.chat.id, "Failed to send command reply");
        }
        HandlerResponse::Reply(text.to_string())
    }

    async fn reply_html(&self, message: &Message, html: String) -> HandlerResponse {
        if let Err(e) = self.bot.reply_html(message.chat.id, &message.id, &html).await {
            warn!(error = %e, chat_id = message.chat.id, "Failed to send command reply");
        }
        HandlerResponse::Reply(html)
    }

    async fn execute(&self, message: &Message, command: AdminCommand) -> Result<HandlerResponse> {
        let chat_id = message.chat.id;
        let new_trigger = match command {
            AdminCommand::Start => return Ok(self.reply(message, messages::START).await),
            AdminCommand::Set {
                keyword,
                delay_secs,
                payload,
            } => NewTrigger::normal(chat_id, keyword, delay_secs, payload),
            AdminCommand::SetQuarantine {
                keyword,
                delay_secs,
                exit_keyword,
                payload,
            } => NewTrigger::quarantine_entry(chat_id, keyword, delay_secs, exit_keyword, payload),
            AdminCommand::SetExit {
                keyword,
                delay_secs,
                payload,
            } => NewTrigger::quarantine_exit(chat_id, keyword, delay_secs, payload),
            AdminCommand::List => {
                let triggers = self.triggers.list(chat_id).await.map_err(db_error)?;
                if triggers.is_empty() {
                    return Ok(self.reply(message, messages::NO_TRIGGERS).await);
                }
                return Ok(self.reply_html(message, messages::trigger_list(&triggers)).await);
            }
            AdminCommand::Remove { keyword } => {
                let existed = self.triggers.remove(chat_id, &keyword).await.map_err(db_error)?;
                return Ok(self.reply(message, messages::removed(existed)).await);
            }
            AdminCommand::Clear => {
                let count = self.triggers.clear(chat_id).await.map_err(db_error)?;
                return Ok(self.reply(message, &messages::cleared(count)).await);
            }
        };

        self.triggers.add(&new_trigger).await.map_err(db_error)?;
        let text = messages::saved(
            &new_trigger.keyword,
            new_trigger.delay_secs,
            new_trigger.kind,
            new_trigger.exit_keyword.as_deref(),
        );
        if new_trigger.kind == TriggerKind::QuarantineEntry {
            info!(chat_id = chat_id, keyword = %new_trigger.keyword, "Quarantine trigger registered");
        }
        Ok(self.reply_html(message, text).await)
    }
}

#[async_trait]
impl Handler for CommandHandler {
    #[instrument(skip(self, message))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        if !message.is_command() {
            return Ok(HandlerResponse::Continue);
        }

        let parsed = AdminCommand::parse(&message.content);
        if let Ok(None) = parsed {
            debug!(content = %message.content, "Ignoring unknown command");
            return Ok(HandlerResponse::Stop);
        }

        if !matches!(parsed, Ok(Some(AdminCommand::Start))) {
            if let Err(e) = self.check_access(message).await {
                warn!(
                    user_id = message.user.id,
                    chat_id = message.chat.id,
                    error = %e,
                    "Trigger command refused"
                );
                return Ok(self.reply(message, &e.to_string()).await);
            }
        }

        match parsed {
            Ok(Some(command)) => {
                info!(
                    user_id = message.user.id,
                    chat_id = message.chat.id,
                    command = ?command,
                    "step: executing admin command"
                );
                self.execute(message, command).await
            }
            Ok(None) => Ok(HandlerResponse::Stop),
            Err(e) => {
                let e = HandlerError::from(e);
                debug!(error = %e, "Rejected malformed command");
                Ok(self.reply(message, &e.to_string()).await)
            }
        }
    }
}
