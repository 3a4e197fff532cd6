//! Error types shared by handlers and platform adapters.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbotError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Bot error: {0}")]
    Bot(String),

    #[error("Handler error: {0}")]
    Handler(#[from] HandlerError),

    #[error("Config error: {0}")]
    Config(String),
}

/// Errors a handler reports back to the sender instead of propagating. The display text is user-facing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HandlerError {
    #[error("{0}")]
    InvalidCommand(String),

    #[error("This command only works in groups.")]
    GroupOnly,

    #[error("Only group admins can manage triggers.")]
    Unauthorized,
}

pub type Result<T> = std::result::Result<T, DbotError>;
