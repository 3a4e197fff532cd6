//! Presence repository: memberships (user, chat) and quarantines, one row per quarantined user.
//!
//! Every read-then-write transition (claim, enter_quarantine, release) runs in a single
//! transaction so two messages from the same user cannot interleave between the read and the write.

use chrono::Utc;
use sqlx::SqliteConnection;
use tracing::{debug, info};

use crate::error::StorageError;
use crate::models::{Claim, PresenceState, QuarantineRecord};
use crate::sqlite_pool::SqlitePoolManager;

#[derive(Clone)]
pub struct PresenceRepository {
    pool_manager: SqlitePoolManager,
}

impl PresenceRepository {
    /// Creates the repository and its tables on the shared pool.
    pub async fn new(pool_manager: SqlitePoolManager) -> Result<Self, StorageError> {
        let repo = Self { pool_manager };
        repo.init().await?;
        Ok(repo)
    }

    async fn init(&self) -> Result<(), StorageError> {
        info!("Creating presence tables if not exist");

        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS memberships (
                user_id INTEGER NOT NULL,
                chat_id INTEGER NOT NULL,
                created_at TEXT NOT NULL,
                PRIMARY KEY (user_id, chat_id)
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS quarantines (
                user_id INTEGER PRIMARY KEY,
                chat_id INTEGER NOT NULL,
                exit_keyword TEXT NOT NULL,
                entered_at TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Current state of a user.
    pub async fn state(&self, user_id: i64) -> Result<PresenceState, StorageError> {
        let mut conn = self.pool_manager.pool().acquire().await?;
        Ok(load_state(&mut conn, user_id).await?)
    }

    /// Active quarantine of a user, if any.
    pub async fn quarantine(&self, user_id: i64) -> Result<Option<QuarantineRecord>, StorageError> {
        let mut conn = self.pool_manager.pool().acquire().await?;
        Ok(load_quarantine(&mut conn, user_id).await?)
    }

    /// Chats the user has a recorded membership in, oldest first.
    pub async fn memberships(&self, user_id: i64) -> Result<Vec<i64>, StorageError> {
        let rows: Vec<(i64,)> = sqlx::query_as(
            "SELECT chat_id FROM memberships WHERE user_id = ? ORDER BY created_at, rowid",
        )
        .bind(user_id)
        .fetch_all(self.pool_manager.pool())
        .await?;
        Ok(rows.into_iter().map(|r| r.0).collect())
    }

    /// Decides whether the user may be present in `chat_id` and records the membership if so.
    ///
    /// With `single_chat` off, only an active quarantine elsewhere rejects the user.
    pub async fn claim(&self, user_id: i64, chat_id: i64, single_chat: bool) -> Result<Claim, StorageError> {
        let mut tx = self.pool_manager.pool().begin().await?;

        let claim = match load_state(&mut tx, user_id).await? {
            PresenceState::Quarantined {
                chat_id: quarantine_chat,
                exit_keyword,
            } if quarantine_chat == chat_id => Claim::Quarantined { exit_keyword },
            PresenceState::Quarantined {
                chat_id: quarantine_chat,
                ..
            } => {
                delete_membership(&mut tx, user_id, chat_id).await?;
                Claim::Rejected {
                    anchor_chat_id: quarantine_chat,
                }
            }
            PresenceState::Anchored { chat_id: anchor } if single_chat && anchor != chat_id => {
                delete_membership(&mut tx, user_id, chat_id).await?;
                Claim::Rejected {
                    anchor_chat_id: anchor,
                }
            }
            PresenceState::Anchored { .. } | PresenceState::Free => {
                let first_seen = insert_membership(&mut tx, user_id, chat_id).await?;
                Claim::Admitted { first_seen }
            }
        };

        tx.commit().await?;

        debug!(user_id = user_id, chat_id = chat_id, claim = ?claim, "Presence claim");
        Ok(claim)
    }

    /// Pins the user to `chat_id` until `exit_keyword` is seen.
    ///
    /// Returns the other chats whose memberships were dropped (the caller kicks the user from each),
    /// or `None` when the user is already quarantined, in which case nothing changes.
    pub async fn enter_quarantine(
        &self,
        user_id: i64,
        chat_id: i64,
        exit_keyword: &str,
    ) -> Result<Option<Vec<i64>>, StorageError> {
        let mut tx = self.pool_manager.pool().begin().await?;

        if load_quarantine(&mut tx, user_id).await?.is_some() {
            tx.rollback().await?;
            return Ok(None);
        }

        sqlx::query(
            "INSERT INTO quarantines (user_id, chat_id, exit_keyword, entered_at) VALUES (?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(chat_id)
        .bind(exit_keyword)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        insert_membership(&mut tx, user_id, chat_id).await?;

        let others: Vec<(i64,)> = sqlx::query_as(
            "SELECT chat_id FROM memberships WHERE user_id = ? AND chat_id != ? ORDER BY created_at, rowid",
        )
        .bind(user_id)
        .bind(chat_id)
        .fetch_all(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM memberships WHERE user_id = ? AND chat_id != ?")
            .bind(user_id)
            .bind(chat_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        let others: Vec<i64> = others.into_iter().map(|r| r.0).collect();
        info!(
            user_id = user_id,
            chat_id = chat_id,
            exit_keyword = %exit_keyword,
            dropped_chats = ?others,
            "User entered quarantine"
        );
        Ok(Some(others))
    }

    /// Clears the quarantine and every membership of the user (back to Free).
    /// Returns whether anything was removed.
    pub async fn release(&self, user_id: i64) -> Result<bool, StorageError> {
        let mut tx = self.pool_manager.pool().begin().await?;

        let quarantines = sqlx::query("DELETE FROM quarantines WHERE user_id = ?")
            .bind(user_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        let memberships = sqlx::query("DELETE FROM memberships WHERE user_id = ?")
            .bind(user_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;

        info!(
            user_id = user_id,
            quarantines = quarantines,
            memberships = memberships,
            "User released"
        );
        Ok(quarantines + memberships > 0)
    }

    /// Drops one membership. Returns whether it existed.
    pub async fn remove_membership(&self, user_id: i64, chat_id: i64) -> Result<bool, StorageError> {
        let mut conn = self.pool_manager.pool().acquire().await?;
        Ok(delete_membership(&mut conn, user_id, chat_id).await?)
    }
}

async fn load_quarantine(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<Option<QuarantineRecord>, sqlx::Error> {
    sqlx::query_as::<_, QuarantineRecord>("SELECT * FROM quarantines WHERE user_id = ?")
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await
}

async fn load_state(conn: &mut SqliteConnection, user_id: i64) -> Result<PresenceState, sqlx::Error> {
    if let Some(q) = load_quarantine(conn, user_id).await? {
        return Ok(PresenceState::Quarantined {
            chat_id: q.chat_id,
            exit_keyword: q.exit_keyword,
        });
    }

    let anchor: Option<(i64,)> = sqlx::query_as(
        "SELECT chat_id FROM memberships WHERE user_id = ? ORDER BY created_at, rowid LIMIT 1",
    )
    .bind(user_id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(match anchor {
        Some((chat_id,)) => PresenceState::Anchored { chat_id },
        None => PresenceState::Free,
    })
}

async fn insert_membership(
    conn: &mut SqliteConnection,
    user_id: i64,
    chat_id: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "INSERT OR IGNORE INTO memberships (user_id, chat_id, created_at) VALUES (?, ?, ?)",
    )
    .bind(user_id)
    .bind(chat_id)
    .bind(Utc::now())
    .execute(&mut *conn)
    .await?;
    Ok(result.rows_affected() > 0)
}

async fn delete_membership(
    conn: &mut SqliteConnection,
    user_id: i64,
    chat_id: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM memberships WHERE user_id = ? AND chat_id = ?")
        .bind(user_id)
        .bind(chat_id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}
