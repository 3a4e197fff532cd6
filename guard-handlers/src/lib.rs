//! # guard-handlers
//!
//! Handlers that turn the generic handler chain into a group guard: admin trigger commands,
//! the single-chat presence policy, the join policy and keyword triggers with delayed replies.
//!
//! Chain order matters: [`LoggingHandler`] → [`CommandHandler`] → [`JoinHandler`] →
//! [`PresenceHandler`] → [`TriggerHandler`]. Presence enforcement stops the chain before
//! a trigger can fire for a sender who does not belong in the chat.

mod commands;
mod config;
mod join;
mod logging;
mod messages;
mod moderation;
mod presence;
mod scheduler;
mod triggers;

pub use commands::{AdminCommand, CommandHandler, CommandParseError};
pub use config::{GuardConfig, DEFAULT_RELEASE_KEYWORD};
pub use join::JoinHandler;
pub use logging::LoggingHandler;
pub use moderation::{is_admin, kick};
pub use presence::PresenceHandler;
pub use scheduler::ReplyScheduler;
pub use triggers::TriggerHandler;

use dbot_core::DbotError;
use storage::StorageError;

pub(crate) fn db_error(e: StorageError) -> DbotError {
    DbotError::Database(e.to_string())
}
