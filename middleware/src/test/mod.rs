//! Unit test module
//!
//! Middleware unit tests live here, separate from source files.
//! Tests interact with middlewares via the `Middleware` trait and a minimal context.


use async_trait::async_trait;
use chrono::Utc;
use mbot_core::{
    Channel, Client, Config, Context, Event, MbotError, NewPost, Post, Reaction, Result, User,
};

pub(crate) const BOT_ID: &str = "botuserid";

/// Client that refuses every call; middlewares must not need the platform.
pub(crate) struct OfflineClient;

#[async_trait]
impl Client for OfflineClient {
    async fn me(&self) -> Result<User> {
        Err(MbotError::Http("offline".to_string()))
    }

    async fn create_post(&self, _post: &NewPost) -> Result<Post> {
        Err(MbotError::Http("offline".to_string()))
    }

    async fn channel(&self, _channel_id: &str) -> Result<Channel> {
        Err(MbotError::Http("offline".to_string()))
    }

    async fn add_reaction(&self, _reaction: &Reaction) -> Result<()> {
        Err(MbotError::Http("offline".to_string()))
    }

    async fn patch_post(&self, _post_id: &str, _message: &str) -> Result<Post> {
        Err(MbotError::Http("offline".to_string()))
    }
}

pub(crate) struct TestContext {
    config: Config,
    me: User,
    client: OfflineClient,
}

impl TestContext {
    pub(crate) fn new() -> Self {
        Self {
            config: Config::new(
                "https://chat.example.com/api/v4",
                "wss://chat.example.com/api/v4/websocket",
                "token",
                "flobot",
                "debugchan",
            ),
            me: User {
                id: BOT_ID.to_string(),
                username: "flobot".to_string(),
                first_name: None,
                last_name: None,
                is_bot: true,
            },
            client: OfflineClient,
        }
    }
}

impl Context for TestContext {
    type Store = ();

    fn store(&self) -> &() {
        &()
    }

    fn client(&self) -> &dyn Client {
        &self.client
    }

    fn config(&self) -> &Config {
        &self.config
    }

    fn me(&self) -> &User {
        &self.me
    }
}

pub(crate) fn posted(user_id: &str, message: &str) -> Event {
    Event::Posted(Post {
        id: "p1".to_string(),
        channel_id: "chan1".to_string(),
        user_id: user_id.to_string(),
        root_id: String::new(),
        team_id: "team1".to_string(),
        message: message.to_string(),
        created_at: Utc::now(),
    })
}
