//! Trigger record model for persistence.
//!
//! Maps to the `triggers` table and is used by TriggerRepository.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What the bot does when a trigger matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerAction {
    /// Reply in the thread with this text.
    Text(String),
    /// React with this emoji name (no colons).
    Emoji(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerRecord {
    pub team_id: String,
    pub triggered_by: String,
    pub action: TriggerAction,
    pub created_at: DateTime<Utc>,
}

impl TriggerRecord {
    pub fn is_emoji(&self) -> bool {
        matches!(self.action, TriggerAction::Emoji(_))
    }
}
