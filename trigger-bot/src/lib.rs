//! # trigger-bot
//!
//! Application crate: env config, component assembly, CLI, the polling runner and the
//! axum webhook server around the guard handler chain.

pub mod cli;
pub mod components;
pub mod config;
pub mod runner;
pub mod server;

pub use cli::{Cli, Commands};
pub use components::{build_bot_components, build_handler_chain, BotComponents};
pub use config::{BaseConfig, BotConfig, ServerConfig};
pub use runner::{register_webhook, run_bot, serve, set_webhook};
pub use server::{build_router, AppState};
