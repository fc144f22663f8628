//! Edit record model: a message key the bot rewrites into a replacement text.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who an edit applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditScope {
    /// Every member of this team.
    Team(String),
    /// Only this user, in any team.
    User(String),
}

impl EditScope {
    pub(crate) fn column(&self) -> (&'static str, &str) {
        match self {
            EditScope::Team(id) => ("team", id),
            EditScope::User(id) => ("user", id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditRecord {
    pub edit: String,
    pub replacement: String,
    pub scope: EditScope,
    pub created_at: DateTime<Utc>,
}
