//! Trigger repository: per-chat keyword registry.
//!
//! Uses SqlitePoolManager and the Trigger models. Upserts keep the original row id so listing
//! order stays the registration order.

use chrono::Utc;
use tracing::{debug, info};

use crate::error::StorageError;
use crate::models::{NewTrigger, Trigger, TriggerRow};
use crate::sqlite_pool::SqlitePoolManager;

#[derive(Clone)]
pub struct TriggerRepository {
    pool_manager: SqlitePoolManager,
}

impl TriggerRepository {
    /// Creates the repository and its table on the shared pool.
    pub async fn new(pool_manager: SqlitePoolManager) -> Result<Self, StorageError> {
        let repo = Self { pool_manager };
        repo.init().await?;
        Ok(repo)
    }

    async fn init(&self) -> Result<(), StorageError> {
        info!("Creating triggers table if not exist");

        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS triggers (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                chat_id INTEGER NOT NULL,
                keyword TEXT NOT NULL,
                delay_secs INTEGER NOT NULL,
                payload TEXT NOT NULL DEFAULT '',
                kind TEXT NOT NULL DEFAULT 'normal',
                exit_keyword TEXT,
                created_at TEXT NOT NULL,
                UNIQUE (chat_id, keyword)
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_triggers_chat_id ON triggers(chat_id)")
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Inserts or replaces the trigger keyed by (chat_id, keyword).
    pub async fn add(&self, trigger: &NewTrigger) -> Result<(), StorageError> {
        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            INSERT INTO triggers (chat_id, keyword, delay_secs, payload, kind, exit_keyword, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(chat_id, keyword) DO UPDATE SET
                delay_secs = excluded.delay_secs,
                payload = excluded.payload,
                kind = excluded.kind,
                exit_keyword = excluded.exit_keyword
            "#,
        )
        .bind(trigger.chat_id)
        .bind(&trigger.keyword)
        .bind(trigger.delay_secs)
        .bind(&trigger.payload)
        .bind(trigger.kind.as_str())
        .bind(trigger.exit_keyword.as_deref())
        .bind(Utc::now())
        .execute(pool)
        .await?;

        info!(
            chat_id = trigger.chat_id,
            keyword = %trigger.keyword,
            delay_secs = trigger.delay_secs,
            kind = %trigger.kind,
            "Saved trigger"
        );
        Ok(())
    }

    /// All triggers of a chat in registration order.
    pub async fn list(&self, chat_id: i64) -> Result<Vec<Trigger>, StorageError> {
        let pool = self.pool_manager.pool();

        let rows: Vec<TriggerRow> =
            sqlx::query_as::<_, TriggerRow>("SELECT * FROM triggers WHERE chat_id = ? ORDER BY id")
                .bind(chat_id)
                .fetch_all(pool)
                .await?;

        debug!(chat_id = chat_id, count = rows.len(), "Listed triggers");
        rows.into_iter().map(Trigger::try_from).collect()
    }

    /// First trigger (registration order) whose keyword occurs in `text`.
    pub async fn find_match(&self, chat_id: i64, text: &str) -> Result<Option<Trigger>, StorageError> {
        let triggers = self.list(chat_id).await?;
        Ok(triggers.into_iter().find(|t| t.matches(text)))
    }

    /// Deletes one trigger. Returns whether it existed.
    pub async fn remove(&self, chat_id: i64, keyword: &str) -> Result<bool, StorageError> {
        let pool = self.pool_manager.pool();

        let result = sqlx::query("DELETE FROM triggers WHERE chat_id = ? AND keyword = ?")
            .bind(chat_id)
            .bind(keyword)
            .execute(pool)
            .await?;

        info!(chat_id = chat_id, keyword = %keyword, removed = result.rows_affected(), "Removed trigger");
        Ok(result.rows_affected() > 0)
    }

    /// Deletes every trigger of a chat. Returns the number removed.
    pub async fn clear(&self, chat_id: i64) -> Result<u64, StorageError> {
        let pool = self.pool_manager.pool();

        let result = sqlx::query("DELETE FROM triggers WHERE chat_id = ?")
            .bind(chat_id)
            .execute(pool)
            .await?;

        info!(chat_id = chat_id, removed = result.rows_affected(), "Cleared triggers");
        Ok(result.rows_affected())
    }
}
