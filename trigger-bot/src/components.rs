//! Component factory: builds BotComponents from config. Isolates assembly logic from runner.

use std::sync::Arc;

use anyhow::Result;
use dbot_core::Bot;
use guard_handlers::{
    CommandHandler, JoinHandler, LoggingHandler, PresenceHandler, ReplyScheduler, TriggerHandler,
};
use handler_chain::HandlerChain;
use storage::{PresenceRepository, SqlitePoolManager, TriggerRepository};
use tracing::{error, info, instrument};

use crate::config::BotConfig;

/// Shared dependencies of the handlers, the polling runner and the webhook server.
#[derive(Clone)]
pub struct BotComponents {
    pub bot: Arc<dyn Bot>,
    pub triggers: TriggerRepository,
    pub presence: PresenceRepository,
    pub scheduler: ReplyScheduler,
}

/// Opens the database, creates the repositories and the reply scheduler around `bot`.
#[instrument(skip(config, bot))]
pub async fn build_bot_components(config: &BotConfig, bot: Arc<dyn Bot>) -> Result<BotComponents> {
    let pool = SqlitePoolManager::new(config.database_url())
        .await
        .map_err(|e| {
            error!(
                error = %e,
                database_url = %config.database_url(),
                "Failed to open database"
            );
            anyhow::anyhow!("Failed to open database: {}", e)
        })?;

    let triggers = TriggerRepository::new(pool.clone())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to initialize trigger storage: {}", e))?;
    let presence = PresenceRepository::new(pool)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to initialize presence storage: {}", e))?;

    let scheduler = ReplyScheduler::new(bot.clone());

    info!(database_url = %config.database_url(), "Bot components ready");

    Ok(BotComponents {
        bot,
        triggers,
        presence,
        scheduler,
    })
}

/// Chain order: logging, admin commands, join policy, presence policy, triggers.
pub fn build_handler_chain(config: &BotConfig, components: &BotComponents) -> HandlerChain {
    let guard = config.guard().clone();
    let bot = components.bot.clone();

    HandlerChain::new()
        .add_handler(Arc::new(LoggingHandler))
        .add_handler(Arc::new(CommandHandler::new(
            bot.clone(),
            components.triggers.clone(),
        )))
        .add_handler(Arc::new(JoinHandler::new(
            bot.clone(),
            components.presence.clone(),
            guard.clone(),
        )))
        .add_handler(Arc::new(PresenceHandler::new(
            bot.clone(),
            components.presence.clone(),
            guard,
        )))
        .add_handler(Arc::new(TriggerHandler::new(
            bot,
            components.triggers.clone(),
            components.presence.clone(),
            components.scheduler.clone(),
        )))
}
