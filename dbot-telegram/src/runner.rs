//! Polling REPL and webhook dispatch: converts teloxide messages to core::Message and hands them to the HandlerChain.

use anyhow::Result;
use dbot_core::ToCoreMessage;
use handler_chain::HandlerChain;
use teloxide::prelude::*;
use teloxide::types::{Update, UpdateKind};
use tracing::{debug, error, info, instrument, warn};

use super::adapters::TelegramMessageWrapper;

/// Starts long polling with the given teloxide Bot and HandlerChain.
/// Each message is converted to core::Message and handled on its own task, so a slow handler never blocks polling.
#[instrument(skip(bot, handler_chain))]
pub async fn run_repl(bot: teloxide::Bot, handler_chain: HandlerChain) -> Result<()> {
    match bot.get_me().await {
        Ok(me) => info!(
            username = ?me.user.username,
            bot_id = me.user.id.0,
            "Bot identity resolved before repl"
        ),
        Err(e) => warn!(error = %e, "get_me failed; continuing with polling"),
    }

    let chain = handler_chain;
    teloxide::repl(bot, move |_bot: Bot, msg: teloxide::types::Message| {
        let chain = chain.clone();
        async move {
            tokio::spawn(async move {
                dispatch_message(&chain, &msg).await;
            });
            respond(())
        }
    })
    .await;

    Ok(())
}

/// Runs the chain for one Telegram message. Chain errors are logged, never propagated.
pub async fn dispatch_message(chain: &HandlerChain, msg: &teloxide::types::Message) {
    let core_msg = TelegramMessageWrapper(msg).to_core();

    info!(
        user_id = core_msg.user.id,
        chat_id = core_msg.chat.id,
        message_id = %core_msg.id,
        message_type = %core_msg.message_type,
        message_content = %core_msg.content,
        "Received message"
    );

    if let Err(e) = chain.handle(&core_msg).await {
        error!(
            error = %e,
            user_id = core_msg.user.id,
            chat_id = core_msg.chat.id,
            "Handler chain failed"
        );
    }
}

/// Decodes a webhook body into a Telegram Update. Returns None (and logs) for malformed payloads.
pub fn parse_update(body: &[u8]) -> Option<Update> {
    match serde_json::from_slice::<Update>(body) {
        Ok(update) => Some(update),
        Err(e) => {
            warn!(error = %e, body_len = body.len(), "Ignoring malformed update");
            None
        }
    }
}

/// Routes one webhook Update to the chain. Only plain messages are handled; other update kinds are ignored.
pub async fn dispatch_update(chain: &HandlerChain, update: Update) {
    match update.kind {
        UpdateKind::Message(msg) => dispatch_message(chain, &msg).await,
        _ => debug!(update_id = update.id.0, "Ignoring non-message update"),
    }
}
