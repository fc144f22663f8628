//! Wire models of the Mattermost API v4 (REST bodies and WebSocket frames).

use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub(crate) struct ApiUser {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub is_bot: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiPost {
    pub id: String,
    #[serde(default)]
    pub create_at: i64,
    pub user_id: String,
    pub channel_id: String,
    #[serde(default)]
    pub root_id: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiChannel {
    pub id: String,
    #[serde(default)]
    pub team_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(rename = "type", default)]
    pub channel_type: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ApiReaction {
    pub user_id: String,
    pub post_id: String,
    pub emoji_name: String,
}

/// Body of `PUT posts/{id}/patch`; only the message is ever changed.
#[derive(Debug, Serialize)]
pub(crate) struct ApiPostPatch {
    pub message: String,
}

/// Error body returned by the platform on non-2xx replies and FAIL status frames.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub detailed_error: String,
    #[serde(default)]
    pub status_code: i64,
}

/// Reply to an action sent on the live connection, e.g. the authentication challenge.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusReply {
    pub status: String,
    #[serde(default)]
    pub seq_reply: Option<i64>,
    #[serde(default)]
    pub error: Option<ApiError>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Broadcast {
    #[serde(default)]
    pub channel_id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub team_id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WsEvent {
    pub event: String,
    #[serde(default)]
    pub data: serde_json::Value,
    #[serde(default)]
    pub broadcast: Broadcast,
    #[serde(default)]
    pub seq: i64,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum WsFrame {
    Reply(StatusReply),
    Event(WsEvent),
}
