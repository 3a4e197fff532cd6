//! Trigger model: an admin-registered keyword → delayed reply rule scoped to one chat.
//!
//! Maps to the `triggers` table and is used by TriggerRepository.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StorageError;

/// What happens to the sender's presence state when the trigger fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerKind {
    /// Reply only.
    Normal,
    /// Reply and pin the sender to this chat until the linked exit keyword is seen.
    QuarantineEntry,
    /// Reply; paired with a quarantine entry's exit keyword.
    QuarantineExit,
}

impl TriggerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerKind::Normal => "normal",
            TriggerKind::QuarantineEntry => "quarantine_entry",
            TriggerKind::QuarantineExit => "quarantine_exit",
        }
    }
}

impl fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TriggerKind {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(TriggerKind::Normal),
            "quarantine_entry" => Ok(TriggerKind::QuarantineEntry),
            "quarantine_exit" => Ok(TriggerKind::QuarantineExit),
            other => Err(StorageError::InvalidData(format!("unknown trigger kind: {}", other))),
        }
    }
}

/// A stored trigger. `id` grows with registration order and is kept across upserts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trigger {
    pub id: i64,
    pub chat_id: i64,
    pub keyword: String,
    pub delay_secs: u32,
    pub payload: String,
    pub kind: TriggerKind,
    pub exit_keyword: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Trigger {
    /// Case-insensitive substring match of the keyword anywhere in `text`.
    pub fn matches(&self, text: &str) -> bool {
        contains_keyword(text, &self.keyword)
    }

    pub fn delay(&self) -> Duration {
        Duration::from_secs(u64::from(self.delay_secs))
    }
}

/// Case-insensitive substring test shared by trigger and exit-keyword matching. An empty keyword never matches.
pub fn contains_keyword(text: &str, keyword: &str) -> bool {
    !keyword.is_empty() && text.to_lowercase().contains(&keyword.to_lowercase())
}

/// Input for TriggerRepository::add.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTrigger {
    pub chat_id: i64,
    pub keyword: String,
    pub delay_secs: u32,
    pub payload: String,
    pub kind: TriggerKind,
    pub exit_keyword: Option<String>,
}

impl NewTrigger {
    /// A plain keyword → delayed reply trigger.
    pub fn normal(chat_id: i64, keyword: impl Into<String>, delay_secs: u32, payload: impl Into<String>) -> Self {
        Self {
            chat_id,
            keyword: keyword.into(),
            delay_secs,
            payload: payload.into(),
            kind: TriggerKind::Normal,
            exit_keyword: None,
        }
    }

    /// A trigger that quarantines the sender until `exit_keyword` is sent.
    pub fn quarantine_entry(
        chat_id: i64,
        keyword: impl Into<String>,
        delay_secs: u32,
        exit_keyword: impl Into<String>,
        payload: impl Into<String>,
    ) -> Self {
        Self {
            kind: TriggerKind::QuarantineEntry,
            exit_keyword: Some(exit_keyword.into()),
            ..Self::normal(chat_id, keyword, delay_secs, payload)
        }
    }

    /// A reply trigger for the exit side of a quarantine.
    pub fn quarantine_exit(chat_id: i64, keyword: impl Into<String>, delay_secs: u32, payload: impl Into<String>) -> Self {
        Self {
            kind: TriggerKind::QuarantineExit,
            ..Self::normal(chat_id, keyword, delay_secs, payload)
        }
    }
}

/// Raw `triggers` row; `kind` is stored as text.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct TriggerRow {
    pub id: i64,
    pub chat_id: i64,
    pub keyword: String,
    pub delay_secs: u32,
    pub payload: String,
    pub kind: String,
    pub exit_keyword: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<TriggerRow> for Trigger {
    type Error = StorageError;

    fn try_from(row: TriggerRow) -> Result<Self, Self::Error> {
        Ok(Trigger {
            id: row.id,
            chat_id: row.chat_id,
            keyword: row.keyword,
            delay_secs: row.delay_secs,
            payload: row.payload,
            kind: row.kind.parse()?,
            exit_keyword: row.exit_keyword,
            created_at: row.created_at,
        })
    }
}
