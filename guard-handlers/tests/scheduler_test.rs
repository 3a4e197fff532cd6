//! ReplyScheduler timing tests on a paused clock.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{BotCall, MockBot};
use dbot_core::Bot;
use guard_handlers::ReplyScheduler;

/// **Test: Replies go out in deadline order, each no earlier than its delay.**
///
/// **Setup:** Paused clock; replies scheduled at 5s and 2s.
/// **Action:** Advance 1s, 3s, then wait for shutdown.
/// **Expected:** Nothing at 1s; the 2s reply at 3s; both after shutdown, 2s one first.
#[tokio::test(start_paused = true)]
async fn test_replies_fire_after_their_delay() {
    let mock = Arc::new(MockBot::new());
    let bot: Arc<dyn Bot> = mock.clone();
    let scheduler = ReplyScheduler::new(bot);

    scheduler.schedule(-100, "1".to_string(), "late".to_string(), Duration::from_secs(5));
    scheduler.schedule(-100, "2".to_string(), "early".to_string(), Duration::from_secs(2));
    assert_eq!(scheduler.pending(), 2);

    tokio::time::advance(Duration::from_secs(1)).await;
    assert!(mock.calls().is_empty());

    tokio::time::advance(Duration::from_secs(2)).await;
    tokio::task::yield_now().await;
    tokio::task::yield_now().await;
    assert_eq!(mock.html_replies(), vec!["early".to_string()]);

    scheduler.shutdown().await;
    assert_eq!(
        mock.calls(),
        vec![
            BotCall::ReplyHtml {
                chat_id: -100,
                message_id: "2".to_string(),
                html: "early".to_string(),
            },
            BotCall::ReplyHtml {
                chat_id: -100,
                message_id: "1".to_string(),
                html: "late".to_string(),
            },
        ]
    );
    assert_eq!(scheduler.pending(), 0);
}
