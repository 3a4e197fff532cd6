//! # dbot-core
//!
//! Core types and traits for the group guard bot: [`Bot`] (the chat-platform contract), [`Handler`],
//! message, user and chat types, and tracing initialization. Transport-agnostic; used by
//! dbot-telegram, handler-chain and guard-handlers.

pub mod bot;
pub mod error;
pub mod logger;
pub mod types;

pub use bot::{parse_message_id, Bot};
pub use error::{DbotError, HandlerError, Result};
pub use logger::init_tracing;
pub use types::{
    Chat, Handler, HandlerResponse, MemberRole, Message, MessageDirection, ToCoreMessage,
    ToCoreUser, User,
};
