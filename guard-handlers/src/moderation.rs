//! Platform actions the guard takes on users: role checks and kicks.
//! Failures are logged and swallowed; callers only learn whether the action went through.

use dbot_core::Bot;
use tracing::{info, warn};

/// True when the user owns or administers the chat. A failed lookup counts as not admin.
pub async fn is_admin(bot: &dyn Bot, chat_id: i64, user_id: i64) -> bool {
    match bot.member_role(chat_id, user_id).await {
        Ok(role) => role.is_admin(),
        Err(e) => {
            warn!(error = %e, chat_id = chat_id, user_id = user_id, "Role lookup failed; treating as non-admin");
            false
        }
    }
}

/// Removes the user from the chat without a lasting ban: ban, then unban so they may rejoin later.
pub async fn kick(bot: &dyn Bot, chat_id: i64, user_id: i64) -> bool {
    if let Err(e) = bot.ban_member(chat_id, user_id).await {
        warn!(error = %e, chat_id = chat_id, user_id = user_id, "Kick failed at ban");
        return false;
    }
    if let Err(e) = bot.unban_member(chat_id, user_id).await {
        warn!(error = %e, chat_id = chat_id, user_id = user_id, "Kick left user banned; unban failed");
        return false;
    }
    info!(chat_id = chat_id, user_id = user_id, "Kicked user");
    true
}
