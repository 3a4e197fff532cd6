//! User-facing texts. Everything sent with HTML parse mode escapes user-supplied parts.

use dbot_core::User;
use storage::{Trigger, TriggerKind};
use teloxide::utils::html::{bold, code_inline, escape};

pub const START: &str = "🤖 Bot is online.";
pub const NO_TRIGGERS: &str = "No triggers registered.";
pub const RELEASED: &str =
    "✅ You were removed from the active group list. You can now join another group.";

/// Immediate acknowledgement after a trigger matched.
pub fn acknowledgement(delay_secs: u32) -> String {
    format!("✅ A reply will be sent after {} seconds.", delay_secs)
}

/// Reply used when a trigger has no payload.
pub fn default_reply(user: &User, chat_title: Option<&str>, delay_secs: u32) -> String {
    format!(
        "👤 Player {} entered {}.\n\n⏱ Your travel time is {} seconds.",
        bold(&escape(&user.display_name())),
        bold(&escape(chat_title.unwrap_or("Private"))),
        bold(&delay_secs.to_string()),
    )
}

/// Notice posted when a user is removed for being active in another chat.
pub fn kicked_elsewhere(user: &User) -> String {
    format!(
        "⛔ {} cannot be in more than one group at the same time and was removed.",
        user.display_name()
    )
}

pub fn saved(trigger_keyword: &str, delay_secs: u32, kind: TriggerKind, exit_keyword: Option<&str>) -> String {
    let mut text = format!(
        "✅ Saved: {} | {}",
        code_inline(trigger_keyword),
        bold(&format!("{}s", delay_secs))
    );
    match (kind, exit_keyword) {
        (TriggerKind::QuarantineEntry, Some(exit)) => {
            text.push_str(&format!(" | quarantine until {}", code_inline(exit)));
        }
        (TriggerKind::QuarantineExit, _) => text.push_str(" | quarantine exit"),
        _ => {}
    }
    text
}

pub fn removed(existed: bool) -> &'static str {
    if existed {
        "✅ Removed."
    } else {
        "No trigger with that keyword."
    }
}

pub fn cleared(count: u64) -> String {
    format!("🧹 Cleared {} trigger(s).", count)
}

/// HTML listing of a chat's triggers in registration order.
pub fn trigger_list(triggers: &[Trigger]) -> String {
    let lines: Vec<String> = triggers
        .iter()
        .map(|t| {
            let mut line = format!("• {} | {}s", code_inline(&t.keyword), t.delay_secs);
            match (t.kind, t.exit_keyword.as_deref()) {
                (TriggerKind::QuarantineEntry, Some(exit)) => {
                    line.push_str(&format!(" | quarantine, exit {}", code_inline(exit)));
                }
                (TriggerKind::QuarantineExit, _) => line.push_str(" | exit"),
                _ => {}
            }
            if !t.payload.trim().is_empty() {
                line.push_str(" | ");
                line.push_str(&escape(&t.payload));
            }
            line
        })
        .collect();
    format!("📋 Triggers:\n{}", lines.join("\n"))
}
