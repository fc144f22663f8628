//! Core types: user, channel, post, reaction and the events delivered by the live connection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User identity as reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_bot: bool,
}

/// Channel (public, private or direct) identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    pub team_id: String,
    pub name: String,
    pub display_name: String,
    pub channel_type: String,
}

/// A message posted in a channel. `root_id` is empty for thread roots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub channel_id: String,
    pub user_id: String,
    pub root_id: String,
    pub team_id: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Id of the thread this post belongs to: its root, or itself when it starts the thread.
    pub fn thread_root(&self) -> &str {
        if self.root_id.is_empty() {
            &self.id
        } else {
            &self.root_id
        }
    }
}

/// Outgoing message. A `root_id` makes it a reply in that thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewPost {
    pub channel_id: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_id: Option<String>,
}

impl NewPost {
    pub fn new(channel_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            message: message.into(),
            root_id: None,
        }
    }

    pub fn in_thread(mut self, root_id: impl Into<String>) -> Self {
        self.root_id = Some(root_id.into());
        self
    }
}

/// Emoji reaction on a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    pub user_id: String,
    pub post_id: String,
    pub emoji_name: String,
}

/// One occurrence reported by the live connection.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Hello { server_version: String },
    Posted(Post),
    PostEdited(Post),
    PostDeleted(Post),
    ReactionAdded(Reaction),
    ReactionRemoved(Reaction),
    Typing { channel_id: String, user_id: String },
    StatusChange { user_id: String, status: String },
    ChannelViewed { channel_id: String, user_id: String },
    /// Any event kind this crate does not model; `data` is the raw payload.
    Other { kind: String, data: serde_json::Value },
}

impl Event {
    /// Platform name of the event kind (`posted`, `typing`, ...).
    pub fn kind(&self) -> &str {
        match self {
            Event::Hello { .. } => "hello",
            Event::Posted(_) => "posted",
            Event::PostEdited(_) => "post_edited",
            Event::PostDeleted(_) => "post_deleted",
            Event::ReactionAdded(_) => "reaction_added",
            Event::ReactionRemoved(_) => "reaction_removed",
            Event::Typing { .. } => "typing",
            Event::StatusChange { .. } => "status_change",
            Event::ChannelViewed { .. } => "channel_viewed",
            Event::Other { kind, .. } => kind,
        }
    }

    /// Id of the user who caused the event, when the event has one.
    pub fn author(&self) -> Option<&str> {
        match self {
            Event::Posted(post) | Event::PostEdited(post) | Event::PostDeleted(post) => {
                Some(&post.user_id)
            }
            Event::ReactionAdded(reaction) | Event::ReactionRemoved(reaction) => {
                Some(&reaction.user_id)
            }
            Event::Typing { user_id, .. }
            | Event::StatusChange { user_id, .. }
            | Event::ChannelViewed { user_id, .. } => Some(user_id),
            Event::Hello { .. } | Event::Other { .. } => None,
        }
    }

    /// The post carried by post events.
    pub fn post(&self) -> Option<&Post> {
        match self {
            Event::Posted(post) | Event::PostEdited(post) | Event::PostDeleted(post) => Some(post),
            _ => None,
        }
    }

    pub fn post_mut(&mut self) -> Option<&mut Post> {
        match self {
            Event::Posted(post) | Event::PostEdited(post) | Event::PostDeleted(post) => Some(post),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: &str, root_id: &str) -> Post {
        Post {
            id: id.to_string(),
            channel_id: "chan".to_string(),
            user_id: "user".to_string(),
            root_id: root_id.to_string(),
            team_id: "team".to_string(),
            message: "hello".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_thread_root_of_root_post_is_itself() {
        assert_eq!(post("p1", "").thread_root(), "p1");
    }

    #[test]
    fn test_thread_root_of_reply_is_root() {
        assert_eq!(post("p2", "p1").thread_root(), "p1");
    }

    #[test]
    fn test_event_author_and_kind() {
        let event = Event::Posted(post("p1", ""));
        assert_eq!(event.kind(), "posted");
        assert_eq!(event.author(), Some("user"));

        let hello = Event::Hello {
            server_version: "9.0".to_string(),
        };
        assert_eq!(hello.kind(), "hello");
        assert_eq!(hello.author(), None);

        let other = Event::Other {
            kind: "user_added".to_string(),
            data: serde_json::Value::Null,
        };
        assert_eq!(other.kind(), "user_added");
        assert!(other.post().is_none());
    }

    #[test]
    fn test_post_mut_changes_are_visible() {
        let mut event = Event::PostEdited(post("p1", ""));
        event.post_mut().unwrap().message = "edited".to_string();
        assert_eq!(event.post().unwrap().message, "edited");
    }

    #[test]
    fn test_new_post_omits_missing_root() {
        let json = serde_json::to_value(NewPost::new("chan", "hi")).unwrap();
        assert!(json.get("root_id").is_none());

        let json = serde_json::to_value(NewPost::new("chan", "hi").in_thread("p1")).unwrap();
        assert_eq!(json["root_id"], "p1");
    }
}
