//! Bot configuration: BaseConfig (Telegram + log + DB), ServerConfig (webhook) and guard policy.

mod base;
mod bot_config;
mod server;


pub use base::BaseConfig;
pub use bot_config::BotConfig;
pub use server::ServerConfig;
