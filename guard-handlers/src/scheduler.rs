//! Delayed trigger replies.
//!
//! Each reply is a tokio task that sleeps for the trigger delay and then sends the HTML reply.
//! Tasks live only in memory: nothing is retried, and pending replies are lost on restart.

use std::sync::Arc;
use std::time::Duration;

use dbot_core::Bot;
use tokio_util::task::TaskTracker;
use tracing::{error, info};

/// Owns the in-flight delayed replies.
#[derive(Clone)]
pub struct ReplyScheduler {
    bot: Arc<dyn Bot>,
    tracker: TaskTracker,
}

impl ReplyScheduler {
    pub fn new(bot: Arc<dyn Bot>) -> Self {
        Self {
            bot,
            tracker: TaskTracker::new(),
        }
    }

    /// Sends `html` as a reply to `reply_to_message_id` in `chat_id` once `delay` has elapsed.
    pub fn schedule(&self, chat_id: i64, reply_to_message_id: String, html: String, delay: Duration) {
        let bot = self.bot.clone();
        self.tracker.spawn(async move {
            tokio::time::sleep(delay).await;
            match bot.reply_html(chat_id, &reply_to_message_id, &html).await {
                Ok(()) => info!(
                    chat_id = chat_id,
                    reply_to = %reply_to_message_id,
                    "Sent delayed reply"
                ),
                Err(e) => error!(
                    error = %e,
                    chat_id = chat_id,
                    reply_to = %reply_to_message_id,
                    "Failed to send delayed reply"
                ),
            }
        });
        info!(
            chat_id = chat_id,
            delay_secs = delay.as_secs(),
            pending = self.tracker.len(),
            "Scheduled delayed reply"
        );
    }

    /// Number of replies still waiting or being sent.
    pub fn pending(&self) -> usize {
        self.tracker.len()
    }

    /// Stops accepting new replies and waits for the pending ones to go out.
    pub async fn shutdown(&self) {
        self.tracker.close();
        self.tracker.wait().await;
    }
}
