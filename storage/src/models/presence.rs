//! Per-user presence: which chat a user is anchored to and whether a quarantine pins them there.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Derived state of one user under the single-chat policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PresenceState {
    /// No membership and no quarantine.
    Free,
    /// Bound to the oldest chat the user was observed in.
    Anchored { chat_id: i64 },
    /// Pinned to `chat_id` until a message contains `exit_keyword`.
    Quarantined { chat_id: i64, exit_keyword: String },
}

impl PresenceState {
    /// The chat the user currently belongs to, if any.
    pub fn anchor_chat(&self) -> Option<i64> {
        match self {
            PresenceState::Free => None,
            PresenceState::Anchored { chat_id } | PresenceState::Quarantined { chat_id, .. } => {
                Some(*chat_id)
            }
        }
    }
}

/// Outcome of PresenceRepository::claim for a message (or join) in one chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Claim {
    /// Membership recorded; `first_seen` is true when the row is new.
    Admitted { first_seen: bool },
    /// The user is quarantined in this very chat.
    Quarantined { exit_keyword: String },
    /// The user belongs to `anchor_chat_id`; any membership for the claimed chat was removed.
    Rejected { anchor_chat_id: i64 },
}

/// Row of the `quarantines` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct QuarantineRecord {
    pub user_id: i64,
    pub chat_id: i64,
    pub exit_keyword: String,
    pub entered_at: DateTime<Utc>,
}
