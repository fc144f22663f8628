//! Shared helpers: an in-process WebSocket server standing in for the platform, and a recording
//! [`Client`] for driving instances without HTTP.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use futures_util::{SinkExt, StreamExt};
use mbot_core::{Channel, Client, Event, MbotError, NewPost, Post, Reaction, Result, User};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::handshake::server::{Request, Response};
use tokio_tungstenite::tungstenite::Message;

pub const BOT_ID: &str = "botuserid";

/// What the fake platform observed from the client.
#[derive(Debug)]
pub struct Received {
    pub authorization: Option<String>,
    pub first_message: String,
}

/// Accepts one connection, records the handshake and first frame, acknowledges it, sends
/// `frames`, then closes.
pub async fn spawn_ws_server(frames: Vec<String>) -> (String, JoinHandle<Received>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let authorization = Arc::new(Mutex::new(None));
        let seen = Arc::clone(&authorization);

        let mut ws = tokio_tungstenite::accept_hdr_async(stream, move |req: &Request, resp: Response| {
            *seen.lock().unwrap() = req
                .headers()
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            Ok(resp)
        })
        .await
        .unwrap();

        let first_message = match ws.next().await {
            Some(Ok(Message::Text(text))) => text,
            other => panic!("expected authentication challenge, got {:?}", other),
        };
        ws.send(Message::Text(r#"{"status":"OK","seq_reply":1}"#.to_string()))
            .await
            .unwrap();

        for frame in frames {
            ws.send(Message::Text(frame)).await.unwrap();
        }
        let _ = ws.close(None).await;

        let authorization = authorization.lock().unwrap().clone();
        Received {
            authorization,
            first_message,
        }
    });

    (format!("ws://{}", addr), handle)
}

/// Encodes a `posted` frame the way the platform does (post as a JSON string).
pub fn posted_frame(post_id: &str, user_id: &str, message: &str) -> String {
    let post = serde_json::json!({
        "id": post_id,
        "create_at": 1576937676623i64,
        "user_id": user_id,
        "channel_id": "chan1",
        "root_id": "",
        "message": message,
    });
    serde_json::json!({
        "event": "posted",
        "data": { "post": post.to_string(), "team_id": "team1" },
        "broadcast": { "channel_id": "chan1" },
        "seq": 2,
    })
    .to_string()
}

pub fn bot_user() -> User {
    User {
        id: BOT_ID.to_string(),
        username: "flobot".to_string(),
        first_name: None,
        last_name: None,
        is_bot: true,
    }
}

pub fn post_event(post_id: &str, user_id: &str, message: &str) -> Event {
    Event::Posted(Post {
        id: post_id.to_string(),
        channel_id: "chan1".to_string(),
        user_id: user_id.to_string(),
        root_id: String::new(),
        team_id: "team1".to_string(),
        message: message.to_string(),
        created_at: Utc::now(),
    })
}

/// Records posts and reactions instead of calling a platform.
#[derive(Default)]
pub struct RecordingClient {
    pub posts: Mutex<Vec<NewPost>>,
    pub reactions: Mutex<Vec<Reaction>>,
}

impl RecordingClient {
    pub fn posts(&self) -> Vec<NewPost> {
        self.posts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Client for RecordingClient {
    async fn me(&self) -> Result<User> {
        Ok(bot_user())
    }

    async fn create_post(&self, post: &NewPost) -> Result<Post> {
        self.posts.lock().unwrap().push(post.clone());
        Ok(Post {
            id: format!("created{}", self.posts.lock().unwrap().len()),
            channel_id: post.channel_id.clone(),
            user_id: BOT_ID.to_string(),
            root_id: post.root_id.clone().unwrap_or_default(),
            team_id: String::new(),
            message: post.message.clone(),
            created_at: Utc::now(),
        })
    }

    async fn channel(&self, channel_id: &str) -> Result<Channel> {
        Err(MbotError::Api {
            status: 404,
            message: format!("channel {} not found", channel_id),
        })
    }

    async fn add_reaction(&self, reaction: &Reaction) -> Result<()> {
        self.reactions.lock().unwrap().push(reaction.clone());
        Ok(())
    }

    async fn patch_post(&self, post_id: &str, _message: &str) -> Result<Post> {
        Err(MbotError::Api {
            status: 404,
            message: format!("post {} not found", post_id),
        })
    }
}
