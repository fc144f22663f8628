//! The store a running bot hands to its handlers: triggers and edits over one pool.

use crate::edit_repo::EditRepository;
use crate::error::StorageError;
use crate::models::{EditRecord, TriggerRecord};
use crate::repository::{EditStore, TriggerStore};
use crate::sqlite_pool::SqlitePoolManager;
use crate::trigger_repo::TriggerRepository;
use async_trait::async_trait;

#[derive(Clone)]
pub struct BotStore {
    triggers: TriggerRepository,
    edits: EditRepository,
}

impl BotStore {
    /// Opens `database_url` once and creates every table the bot needs.
    pub async fn open(database_url: &str) -> Result<Self, StorageError> {
        let pool_manager = SqlitePoolManager::new(database_url).await?;
        Ok(Self {
            triggers: TriggerRepository::with_pool(pool_manager.clone()).await?,
            edits: EditRepository::with_pool(pool_manager).await?,
        })
    }

    pub fn triggers(&self) -> &TriggerRepository {
        &self.triggers
    }

    pub fn edits(&self) -> &EditRepository {
        &self.edits
    }
}

#[async_trait]
impl TriggerStore for BotStore {
    async fn list(&self, team_id: &str) -> Result<Vec<TriggerRecord>, StorageError> {
        self.triggers.list(team_id).await
    }

    async fn search(&self, team_id: &str) -> Result<Vec<TriggerRecord>, StorageError> {
        self.triggers.search(team_id).await
    }

    async fn add_text(&self, team_id: &str, trigger: &str, text: &str) -> Result<(), StorageError> {
        self.triggers.add_text(team_id, trigger, text).await
    }

    async fn add_emoji(
        &self,
        team_id: &str,
        trigger: &str,
        emoji: &str,
    ) -> Result<(), StorageError> {
        self.triggers.add_emoji(team_id, trigger, emoji).await
    }

    async fn delete(&self, team_id: &str, trigger: &str) -> Result<bool, StorageError> {
        self.triggers.delete(team_id, trigger).await
    }
}

#[async_trait]
impl EditStore for BotStore {
    async fn list_edits(&self, team_id: &str) -> Result<Vec<EditRecord>, StorageError> {
        self.edits.list_edits(team_id).await
    }

    async fn find_edit(
        &self,
        user_id: &str,
        team_id: &str,
        edit: &str,
    ) -> Result<Option<EditRecord>, StorageError> {
        self.edits.find_edit(user_id, team_id, edit).await
    }

    async fn add_team_edit(
        &self,
        team_id: &str,
        edit: &str,
        replacement: &str,
    ) -> Result<(), StorageError> {
        self.edits.add_team_edit(team_id, edit, replacement).await
    }

    async fn add_user_edit(
        &self,
        user_id: &str,
        edit: &str,
        replacement: &str,
    ) -> Result<(), StorageError> {
        self.edits.add_user_edit(user_id, edit, replacement).await
    }

    async fn delete_team_edit(&self, team_id: &str, edit: &str) -> Result<bool, StorageError> {
        self.edits.delete_team_edit(team_id, edit).await
    }

    async fn delete_user_edit(&self, user_id: &str, edit: &str) -> Result<bool, StorageError> {
        self.edits.delete_user_edit(user_id, edit).await
    }
}
