//! Admin command tests: trigger registration, listing, removal and access control.

mod common;

use common::*;
use dbot_core::HandlerResponse;
use storage::TriggerKind;

/// **Test: An admin registers a trigger and sees it in /list.**
///
/// **Setup:** Admin in chat A.
/// **Action:** `/set arrive 5 Welcome`, then `/list`.
/// **Expected:** Trigger stored once; the listing is an HTML reply naming the keyword.
#[tokio::test]
async fn test_admin_set_and_list() {
    let guard = Guard::new().await;

    let response = guard.say(ADMIN, CHAT_A, "/set arrive 5 Welcome").await;
    assert!(matches!(response, HandlerResponse::Reply(_)));

    guard.say(ADMIN, CHAT_A, "/list").await;

    let triggers = guard.triggers.list(CHAT_A).await.expect("list");
    assert_eq!(triggers.len(), 1);
    assert_eq!(triggers[0].keyword, "arrive");
    assert_eq!(triggers[0].delay_secs, 5);
    assert_eq!(triggers[0].payload, "Welcome");

    let html = guard.bot.html_replies();
    assert_eq!(html.len(), 2);
    assert!(html[1].contains("<code>arrive</code> | 5s | Welcome"));
}

/// **Test: Setting the same keyword twice lists it exactly once.**
#[tokio::test]
async fn test_set_twice_lists_once() {
    let guard = Guard::new().await;

    guard.say(ADMIN, CHAT_A, "/set arrive 5 Welcome").await;
    guard.say(ADMIN, CHAT_A, "/set arrive 7 Hello again").await;

    let triggers = guard.triggers.list(CHAT_A).await.expect("list");
    assert_eq!(triggers.len(), 1);
    assert_eq!(triggers[0].delay_secs, 7);
    assert_eq!(triggers[0].payload, "Hello again");
}

/// **Test: /setq and /setexit store quarantine kinds.**
#[tokio::test]
async fn test_quarantine_commands_store_kinds() {
    let guard = Guard::new().await;

    guard.say(ADMIN, CHAT_A, "/setq jail 3 free Locked up").await;
    guard.say(ADMIN, CHAT_A, "/setexit free 1").await;

    let triggers = guard.triggers.list(CHAT_A).await.expect("list");
    assert_eq!(triggers[0].kind, TriggerKind::QuarantineEntry);
    assert_eq!(triggers[0].exit_keyword.as_deref(), Some("free"));
    assert_eq!(triggers[1].kind, TriggerKind::QuarantineExit);
}

/// **Test: Non-admins cannot manage triggers.**
///
/// **Setup:** Alice is a plain member.
/// **Action:** `/set arrive 5`.
/// **Expected:** Refusal reply; nothing stored; Alice's message is not recorded as presence.
#[tokio::test]
async fn test_non_admin_is_refused() {
    let guard = Guard::new().await;

    let response = guard.say(ALICE, CHAT_A, "/set arrive 5").await;

    assert_eq!(
        response,
        HandlerResponse::Reply("Only group admins can manage triggers.".to_string())
    );
    assert!(guard.triggers.list(CHAT_A).await.expect("list").is_empty());
    assert!(guard.presence.memberships(ALICE).await.expect("memberships").is_empty());
}

/// **Test: Trigger commands only work in groups; /start works anywhere.**
#[tokio::test]
async fn test_private_chat_commands() {
    let guard = Guard::new().await;

    let mut msg = text_message(ADMIN, 555, "/set arrive 5");
    msg.chat.chat_type = "private".to_string();
    let response = guard.chain.handle(&msg).await.expect("chain");
    assert_eq!(
        response,
        HandlerResponse::Reply("This command only works in groups.".to_string())
    );

    let mut start = text_message(ALICE, 555, "/start");
    start.chat.chat_type = "private".to_string();
    let response = guard.chain.handle(&start).await.expect("chain");
    assert_eq!(response, HandlerResponse::Reply("🤖 Bot is online.".to_string()));
}

/// **Test: Malformed arguments produce a usage reply and no state change.**
#[tokio::test]
async fn test_malformed_set_replies_usage() {
    let guard = Guard::new().await;

    let response = guard.say(ADMIN, CHAT_A, "/set arrive soon").await;

    match response {
        HandlerResponse::Reply(text) => assert!(text.contains("delay_seconds")),
        other => panic!("expected reply, got {:?}", other),
    }
    assert!(guard.triggers.list(CHAT_A).await.expect("list").is_empty());
}

/// **Test: /clear empties one chat and leaves the others untouched.**
#[tokio::test]
async fn test_clear_is_chat_scoped() {
    let guard = Guard::new().await;

    guard.say(ADMIN, CHAT_A, "/set arrive 5").await;
    guard.say(ADMIN, CHAT_A, "/set leave 5").await;
    guard.say(ADMIN, CHAT_B, "/set arrive 5").await;

    let response = guard.say(ADMIN, CHAT_A, "/clearall").await;

    assert_eq!(response, HandlerResponse::Reply("🧹 Cleared 2 trigger(s).".to_string()));
    assert!(guard.triggers.list(CHAT_A).await.expect("list").is_empty());
    assert_eq!(guard.triggers.list(CHAT_B).await.expect("list").len(), 1);
}

/// **Test: /remove deletes one trigger and reports unknown keywords.**
#[tokio::test]
async fn test_remove() {
    let guard = Guard::new().await;

    guard.say(ADMIN, CHAT_A, "/set arrive 5").await;

    assert_eq!(
        guard.say(ADMIN, CHAT_A, "/remove arrive").await,
        HandlerResponse::Reply("✅ Removed.".to_string())
    );
    assert_eq!(
        guard.say(ADMIN, CHAT_A, "/remove arrive").await,
        HandlerResponse::Reply("No trigger with that keyword.".to_string())
    );
}

/// **Test: A command containing a keyword never fires that trigger.**
///
/// **Setup:** Trigger "arrive".
/// **Action:** Admin sends `/remove arrive`; Alice sends an unknown `/arrive` command.
/// **Expected:** No acknowledgement and nothing scheduled.
#[tokio::test]
async fn test_commands_do_not_fire_triggers() {
    let guard = Guard::new().await;

    guard.say(ADMIN, CHAT_A, "/set arrive 5").await;
    guard.say(ALICE, CHAT_A, "/arrive").await;
    guard.say(ADMIN, CHAT_A, "/remove arrive").await;

    assert_eq!(guard.scheduler.pending(), 0);
    assert!(guard
        .bot
        .text_replies()
        .iter()
        .all(|t| !t.contains("reply will be sent")));
}
