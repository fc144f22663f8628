//! Edit repository: SQLite persistence for team and personal message edits.
//!
//! One row per (scope, owner, key). `scope` is `team` or `user`; `owner_id` is the team or user id.

use crate::error::StorageError;
use crate::models::{EditRecord, EditScope};
use crate::repository::EditStore;
use crate::sqlite_pool::SqlitePoolManager;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument};

#[derive(sqlx::FromRow)]
pub(crate) struct EditRow {
    pub(crate) scope: String,
    pub(crate) owner_id: String,
    pub(crate) edit: String,
    pub(crate) replacement: String,
    pub(crate) created_at: DateTime<Utc>,
}

impl TryFrom<EditRow> for EditRecord {
    type Error = StorageError;

    fn try_from(row: EditRow) -> Result<Self, Self::Error> {
        let scope = match row.scope.as_str() {
            "team" => EditScope::Team(row.owner_id),
            "user" => EditScope::User(row.owner_id),
            other => {
                return Err(StorageError::Corrupt(format!(
                    "edit {:?} has unknown scope {:?}",
                    row.edit, other
                )))
            }
        };
        Ok(EditRecord {
            edit: row.edit,
            replacement: row.replacement,
            scope,
            created_at: row.created_at,
        })
    }
}

#[derive(Clone)]
pub struct EditRepository {
    pool_manager: SqlitePoolManager,
}

impl EditRepository {
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        Self::with_pool(SqlitePoolManager::new(database_url).await?).await
    }

    /// Uses an already open pool; the `edits` table is created if missing.
    pub async fn with_pool(pool_manager: SqlitePoolManager) -> Result<Self, StorageError> {
        let repo = Self { pool_manager };
        repo.init().await?;
        Ok(repo)
    }

    async fn init(&self) -> Result<(), StorageError> {
        info!("Creating edits table if not exist");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS edits (
                scope TEXT NOT NULL CHECK (scope IN ('team', 'user')),
                owner_id TEXT NOT NULL,
                edit TEXT NOT NULL,
                replacement TEXT NOT NULL,
                created_at TEXT NOT NULL,
                PRIMARY KEY (scope, owner_id, edit)
            )
            "#,
        )
        .execute(self.pool_manager.pool())
        .await?;

        Ok(())
    }

    async fn upsert(
        &self,
        scope: &EditScope,
        edit: &str,
        replacement: &str,
    ) -> Result<(), StorageError> {
        let (scope, owner_id) = scope.column();
        sqlx::query(
            r#"
            INSERT INTO edits (scope, owner_id, edit, replacement, created_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT (scope, owner_id, edit)
            DO UPDATE SET replacement = excluded.replacement, created_at = excluded.created_at
            "#,
        )
        .bind(scope)
        .bind(owner_id)
        .bind(edit)
        .bind(replacement)
        .bind(Utc::now())
        .execute(self.pool_manager.pool())
        .await?;

        debug!(scope, owner_id = %owner_id, edit = %edit, "Saved edit");
        Ok(())
    }

    async fn remove(&self, scope: &EditScope, edit: &str) -> Result<bool, StorageError> {
        let (scope, owner_id) = scope.column();
        let result = sqlx::query("DELETE FROM edits WHERE scope = ? AND owner_id = ? AND edit = ?")
            .bind(scope)
            .bind(owner_id)
            .bind(edit)
            .execute(self.pool_manager.pool())
            .await?;

        let deleted = result.rows_affected() > 0;
        debug!(scope, owner_id = %owner_id, edit = %edit, deleted, "Deleted edit");
        Ok(deleted)
    }
}

#[async_trait]
impl EditStore for EditRepository {
    #[instrument(skip(self))]
    async fn list_edits(&self, team_id: &str) -> Result<Vec<EditRecord>, StorageError> {
        let rows: Vec<EditRow> = sqlx::query_as(
            r#"
            SELECT scope, owner_id, edit, replacement, created_at
            FROM edits
            WHERE scope = 'team' AND owner_id = ?
            ORDER BY edit
            "#,
        )
        .bind(team_id)
        .fetch_all(self.pool_manager.pool())
        .await?;
        rows.into_iter().map(EditRecord::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn find_edit(
        &self,
        user_id: &str,
        team_id: &str,
        edit: &str,
    ) -> Result<Option<EditRecord>, StorageError> {
        let row: Option<EditRow> = sqlx::query_as(
            r#"
            SELECT scope, owner_id, edit, replacement, created_at
            FROM edits
            WHERE edit = ?
              AND ((scope = 'user' AND owner_id = ?) OR (scope = 'team' AND owner_id = ?))
            ORDER BY scope = 'team'
            LIMIT 1
            "#,
        )
        .bind(edit.trim())
        .bind(user_id)
        .bind(team_id)
        .fetch_optional(self.pool_manager.pool())
        .await?;
        row.map(EditRecord::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn add_team_edit(
        &self,
        team_id: &str,
        edit: &str,
        replacement: &str,
    ) -> Result<(), StorageError> {
        self.upsert(&EditScope::Team(team_id.to_string()), edit, replacement)
            .await
    }

    #[instrument(skip(self))]
    async fn add_user_edit(
        &self,
        user_id: &str,
        edit: &str,
        replacement: &str,
    ) -> Result<(), StorageError> {
        self.upsert(&EditScope::User(user_id.to_string()), edit, replacement)
            .await
    }

    #[instrument(skip(self))]
    async fn delete_team_edit(&self, team_id: &str, edit: &str) -> Result<bool, StorageError> {
        self.remove(&EditScope::Team(team_id.to_string()), edit).await
    }

    #[instrument(skip(self))]
    async fn delete_user_edit(&self, user_id: &str, edit: &str) -> Result<bool, StorageError> {
        self.remove(&EditScope::User(user_id.to_string()), edit).await
    }
}
