//! Entry points behind the CLI: long polling, webhook server and one-shot webhook registration.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use dbot_core::{init_tracing, Bot};
use dbot_telegram::{run_repl, TelegramBotAdapter};
use handler_chain::HandlerChain;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};

use crate::components::{build_bot_components, build_handler_chain, BotComponents};
use crate::config::BotConfig;
use crate::server::{build_router, AppState};

/// Validates config, installs logging and builds the Telegram adapter, components and chain.
async fn prepare(config: &BotConfig) -> Result<(TelegramBotAdapter, BotComponents, HandlerChain)> {
    config.validate()?;
    init_tracing(config.log_file())?;

    info!(
        database_url = %config.database_url(),
        single_chat = config.guard().single_chat,
        release_keyword = ?config.guard().release_keyword,
        "Initializing bot"
    );

    let adapter = TelegramBotAdapter::from_token(config.bot_token(), config.telegram_api_url())?;
    let bot: Arc<dyn Bot> = Arc::new(adapter.clone());
    let components = build_bot_components(config, bot).await?;
    let chain = build_handler_chain(config, &components);
    Ok((adapter, components, chain))
}

/// Long polling until the REPL exits (Ctrl-C).
#[instrument(skip(config))]
pub async fn run_bot(config: BotConfig) -> Result<()> {
    let (adapter, components, chain) = prepare(&config).await?;

    info!("Bot started successfully (polling)");
    run_repl(adapter.inner().clone(), chain).await?;

    log_dropped_replies(&components);
    Ok(())
}

/// Webhook server on `port` (default from config). Registers the webhook first when BASE_URL is set.
#[instrument(skip(config))]
pub async fn serve(config: BotConfig, port: Option<u16>) -> Result<()> {
    let (_adapter, components, chain) = prepare(&config).await?;
    let webhook_url = config.webhook_url();

    register_webhook(components.bot.as_ref(), webhook_url.as_deref()).await;

    let state = AppState {
        chain,
        bot: components.bot.clone(),
        scheduler: components.scheduler.clone(),
        token: Arc::from(config.bot_token()),
        webhook_url: webhook_url.map(Arc::from),
    };
    let router = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port.unwrap_or(config.server().port)));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind failed on {}", addr))?;

    let shutdown = CancellationToken::new();
    let signal = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Ctrl-C received, shutting down");
        }
        signal.cancel();
    });

    info!(%addr, "Webhook server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .context("webhook server error")?;

    info!("Webhook server shut down");
    log_dropped_replies(&components);
    Ok(())
}

/// Startup registration for `serve`. Failures are logged and the server starts anyway;
/// `GET /set-webhook` retries. Returns whether the webhook was registered.
pub async fn register_webhook(bot: &dyn Bot, webhook_url: Option<&str>) -> bool {
    let Some(url) = webhook_url else {
        warn!("BASE_URL not set; webhook not registered");
        return false;
    };
    match bot.set_webhook(url).await {
        Ok(()) => {
            info!("Webhook registered");
            true
        }
        Err(e) => {
            error!(error = %e, "Webhook registration failed; serving anyway");
            false
        }
    }
}

/// Registers `<BASE_URL>/webhook/<token>` with Telegram and exits.
#[instrument(skip(config))]
pub async fn set_webhook(config: BotConfig) -> Result<()> {
    config.validate()?;
    init_tracing(config.log_file())?;

    let url = config
        .webhook_url()
        .ok_or_else(|| anyhow::anyhow!("BASE_URL must be set to register a webhook"))?;

    let adapter = TelegramBotAdapter::from_token(config.bot_token(), config.telegram_api_url())?;
    adapter.set_webhook(&url).await?;

    info!("Webhook registered");
    Ok(())
}

fn log_dropped_replies(components: &BotComponents) {
    let pending = components.scheduler.pending();
    if pending > 0 {
        warn!(pending = pending, "Exiting with delayed replies still pending; they are dropped");
    }
}
