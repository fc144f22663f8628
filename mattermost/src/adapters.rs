//! Adapters from Mattermost wire models to mbot_core types.
//! Depends only on the wire models and mbot_core type definitions.

use chrono::{DateTime, Utc};
use mbot_core::{Channel, Event, MbotError, Post, Reaction, Result, User};
use serde_json::Value;

use crate::models::{ApiChannel, ApiPost, ApiReaction, ApiUser, StatusReply, WsEvent, WsFrame};

/// One decoded text frame of the live connection.
#[derive(Debug)]
pub enum Frame {
    Event(Event),
    Reply(StatusReply),
}

/// Decodes a text frame. Post and reaction payloads arrive as JSON-encoded strings inside `data`.
pub fn decode_frame(text: &str) -> Result<Frame> {
    match serde_json::from_str::<WsFrame>(text)? {
        WsFrame::Reply(reply) => Ok(Frame::Reply(reply)),
        WsFrame::Event(event) => event.into_core().map(Frame::Event),
    }
}

impl From<ApiUser> for User {
    fn from(user: ApiUser) -> Self {
        User {
            id: user.id,
            username: user.username,
            first_name: non_empty(user.first_name),
            last_name: non_empty(user.last_name),
            is_bot: user.is_bot,
        }
    }
}

impl From<ApiChannel> for Channel {
    fn from(channel: ApiChannel) -> Self {
        Channel {
            id: channel.id,
            team_id: channel.team_id,
            name: channel.name,
            display_name: channel.display_name,
            channel_type: channel.channel_type,
        }
    }
}

impl From<ApiReaction> for Reaction {
    fn from(reaction: ApiReaction) -> Self {
        Reaction {
            user_id: reaction.user_id,
            post_id: reaction.post_id,
            emoji_name: reaction.emoji_name,
        }
    }
}

impl ApiPost {
    /// REST post bodies carry no team; events supply it from their envelope.
    pub(crate) fn into_core(self, team_id: String) -> Post {
        Post {
            id: self.id,
            channel_id: self.channel_id,
            user_id: self.user_id,
            root_id: self.root_id,
            team_id,
            message: self.message,
            created_at: DateTime::<Utc>::from_timestamp_millis(self.create_at)
                .unwrap_or_else(Utc::now),
        }
    }
}

impl WsEvent {
    fn into_core(self) -> Result<Event> {
        let event = match self.event.as_str() {
            "hello" => Event::Hello {
                server_version: str_field(&self.data, "server_version"),
            },
            "posted" => Event::Posted(self.embedded_post()?),
            "post_edited" => Event::PostEdited(self.embedded_post()?),
            "post_deleted" => Event::PostDeleted(self.embedded_post()?),
            "reaction_added" => Event::ReactionAdded(self.embedded_reaction()?),
            "reaction_removed" => Event::ReactionRemoved(self.embedded_reaction()?),
            "typing" => Event::Typing {
                channel_id: self.broadcast.channel_id,
                user_id: str_field(&self.data, "user_id"),
            },
            "status_change" => Event::StatusChange {
                user_id: str_field(&self.data, "user_id"),
                status: str_field(&self.data, "status"),
            },
            "channel_viewed" => Event::ChannelViewed {
                channel_id: str_field(&self.data, "channel_id"),
                user_id: self.broadcast.user_id,
            },
            _ => Event::Other {
                kind: self.event,
                data: self.data,
            },
        };
        Ok(event)
    }

    fn embedded_post(&self) -> Result<Post> {
        let post: ApiPost = self.embedded("post")?;
        let mut team_id = str_field(&self.data, "team_id");
        if team_id.is_empty() {
            team_id = self.broadcast.team_id.clone();
        }
        Ok(post.into_core(team_id))
    }

    fn embedded_reaction(&self) -> Result<Reaction> {
        self.embedded::<ApiReaction>("reaction").map(Reaction::from)
    }

    fn embedded<T: serde::de::DeserializeOwned>(&self, key: &str) -> Result<T> {
        let raw = self.data.get(key).and_then(Value::as_str).ok_or_else(|| {
            MbotError::Decode(format!("{} event without {} payload", self.event, key))
        })?;
        Ok(serde_json::from_str(raw)?)
    }
}

fn str_field(data: &Value, key: &str) -> String {
    data.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
