use crate::error::StorageError;
use crate::models::{EditRecord, TriggerRecord};
use async_trait::async_trait;

/// Per-team trigger persistence.
#[async_trait]
pub trait TriggerStore: Send + Sync {
    /// All triggers of a team, sorted by trigger text.
    async fn list(&self, team_id: &str) -> Result<Vec<TriggerRecord>, StorageError>;
    /// Triggers to evaluate against a message: emoji triggers first, then text triggers.
    async fn search(&self, team_id: &str) -> Result<Vec<TriggerRecord>, StorageError>;
    /// Adds a text trigger, replacing any existing trigger with the same text.
    async fn add_text(&self, team_id: &str, trigger: &str, text: &str) -> Result<(), StorageError>;
    /// Adds an emoji trigger, replacing any existing trigger with the same text.
    async fn add_emoji(&self, team_id: &str, trigger: &str, emoji: &str)
        -> Result<(), StorageError>;
    /// Returns whether a trigger was removed.
    async fn delete(&self, team_id: &str, trigger: &str) -> Result<bool, StorageError>;
}

/// Message edits, scoped to a team or to a single user.
#[async_trait]
pub trait EditStore: Send + Sync {
    /// Team-wide edits of a team, sorted by key.
    async fn list_edits(&self, team_id: &str) -> Result<Vec<EditRecord>, StorageError>;
    /// The edit registered for `edit` (trimmed) that applies to `user_id` posting in `team_id`.
    /// A user edit wins over a team edit with the same key.
    async fn find_edit(
        &self,
        user_id: &str,
        team_id: &str,
        edit: &str,
    ) -> Result<Option<EditRecord>, StorageError>;
    /// Adds a team edit, replacing any existing one with the same key.
    async fn add_team_edit(
        &self,
        team_id: &str,
        edit: &str,
        replacement: &str,
    ) -> Result<(), StorageError>;
    /// Adds a personal edit, replacing any existing one with the same key.
    async fn add_user_edit(
        &self,
        user_id: &str,
        edit: &str,
        replacement: &str,
    ) -> Result<(), StorageError>;
    /// Returns whether a team edit was removed.
    async fn delete_team_edit(&self, team_id: &str, edit: &str) -> Result<bool, StorageError>;
    /// Returns whether a personal edit was removed.
    async fn delete_user_edit(&self, user_id: &str, edit: &str) -> Result<bool, StorageError>;
}
