//! # dbot-telegram
//!
//! Telegram transport layer: adapters to core types, the [`dbot_core::Bot`] implementation, the polling
//! REPL and webhook update dispatch. Handles only Telegram connectivity and handler-chain execution;
//! guard logic and persistence live elsewhere.

mod adapters;
mod bot_adapter;
mod runner;

pub use adapters::{TelegramMessageWrapper, TelegramUserWrapper};
pub use bot_adapter::TelegramBotAdapter;
pub use runner::{dispatch_message, dispatch_update, parse_update, run_repl};
