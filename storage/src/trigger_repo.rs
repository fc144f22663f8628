//! Trigger repository: SQLite persistence for per-team triggers.
//!
//! One row per (team, trigger text); a row carries either an emoji or a reply text.

use crate::error::StorageError;
use crate::models::{TriggerAction, TriggerRecord};
use crate::repository::TriggerStore;
use crate::sqlite_pool::SqlitePoolManager;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument};

#[derive(sqlx::FromRow)]
pub(crate) struct TriggerRow {
    pub(crate) team_id: String,
    pub(crate) triggered_by: String,
    pub(crate) emoji: Option<String>,
    pub(crate) reply: Option<String>,
    pub(crate) created_at: DateTime<Utc>,
}

impl TryFrom<TriggerRow> for TriggerRecord {
    type Error = StorageError;

    fn try_from(row: TriggerRow) -> Result<Self, Self::Error> {
        let action = match (row.emoji, row.reply) {
            (Some(emoji), None) => TriggerAction::Emoji(emoji),
            (None, Some(reply)) => TriggerAction::Text(reply),
            _ => {
                return Err(StorageError::Corrupt(format!(
                    "trigger {:?} of team {} must have exactly one of emoji or reply",
                    row.triggered_by, row.team_id
                )))
            }
        };
        Ok(TriggerRecord {
            team_id: row.team_id,
            triggered_by: row.triggered_by,
            action,
            created_at: row.created_at,
        })
    }
}

#[derive(Clone)]
pub struct TriggerRepository {
    pool_manager: SqlitePoolManager,
}

impl TriggerRepository {
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        Self::with_pool(SqlitePoolManager::new(database_url).await?).await
    }

    /// Uses an already open pool; the `triggers` table is created if missing.
    pub async fn with_pool(pool_manager: SqlitePoolManager) -> Result<Self, StorageError> {
        let repo = Self { pool_manager };
        repo.init().await?;
        Ok(repo)
    }

    async fn init(&self) -> Result<(), StorageError> {
        info!("Creating database tables if not exist");

        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS triggers (
                team_id TEXT NOT NULL,
                triggered_by TEXT NOT NULL,
                emoji TEXT,
                reply TEXT,
                created_at TEXT NOT NULL,
                PRIMARY KEY (team_id, triggered_by)
            )
            "#,
        )
        .execute(pool)
        .await?;

        info!("Database tables created successfully");
        Ok(())
    }

    async fn upsert(
        &self,
        team_id: &str,
        trigger: &str,
        emoji: Option<&str>,
        reply: Option<&str>,
    ) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            INSERT INTO triggers (team_id, triggered_by, emoji, reply, created_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT (team_id, triggered_by)
            DO UPDATE SET emoji = excluded.emoji, reply = excluded.reply, created_at = excluded.created_at
            "#,
        )
        .bind(team_id)
        .bind(trigger)
        .bind(emoji)
        .bind(reply)
        .bind(Utc::now())
        .execute(self.pool_manager.pool())
        .await?;

        debug!(team_id = %team_id, trigger = %trigger, "Saved trigger");
        Ok(())
    }

    async fn fetch(&self, sql: &str, team_id: &str) -> Result<Vec<TriggerRecord>, StorageError> {
        let rows: Vec<TriggerRow> = sqlx::query_as(sql)
            .bind(team_id)
            .fetch_all(self.pool_manager.pool())
            .await?;
        rows.into_iter().map(TriggerRecord::try_from).collect()
    }
}

#[async_trait]
impl TriggerStore for TriggerRepository {
    #[instrument(skip(self))]
    async fn list(&self, team_id: &str) -> Result<Vec<TriggerRecord>, StorageError> {
        self.fetch(
            r#"
            SELECT team_id, triggered_by, emoji, reply, created_at
            FROM triggers
            WHERE team_id = ?
            ORDER BY triggered_by
            "#,
            team_id,
        )
        .await
    }

    #[instrument(skip(self))]
    async fn search(&self, team_id: &str) -> Result<Vec<TriggerRecord>, StorageError> {
        self.fetch(
            r#"
            SELECT team_id, triggered_by, emoji, reply, created_at
            FROM triggers
            WHERE team_id = ?
            ORDER BY emoji IS NULL, triggered_by
            "#,
            team_id,
        )
        .await
    }

    #[instrument(skip(self))]
    async fn add_text(&self, team_id: &str, trigger: &str, text: &str) -> Result<(), StorageError> {
        self.upsert(team_id, trigger, None, Some(text)).await
    }

    #[instrument(skip(self))]
    async fn add_emoji(
        &self,
        team_id: &str,
        trigger: &str,
        emoji: &str,
    ) -> Result<(), StorageError> {
        self.upsert(team_id, trigger, Some(emoji), None).await
    }

    #[instrument(skip(self))]
    async fn delete(&self, team_id: &str, trigger: &str) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM triggers WHERE team_id = ? AND triggered_by = ?")
            .bind(team_id)
            .bind(trigger)
            .execute(self.pool_manager.pool())
            .await?;

        let deleted = result.rows_affected() > 0;
        debug!(team_id = %team_id, trigger = %trigger, deleted, "Deleted trigger");
        Ok(deleted)
    }
}
