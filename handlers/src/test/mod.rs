//! Unit test module
//!
//! Handler unit tests live here, separate from source files.
//! Tests drive handlers through the `Handler` trait with a recording client and an in-memory store.

mod trigger_handler_test;

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use mbot_core::{
    Channel, Client, Config, Context, Event, HelpTopic, MbotError, NewPost, Post, Reaction,
    Result, User,
};

pub(crate) const BOT_ID: &str = "botuserid";

#[derive(Default)]
pub(crate) struct RecordingClient {
    posts: Mutex<Vec<NewPost>>,
    reactions: Mutex<Vec<Reaction>>,
    patches: Mutex<Vec<(String, String)>>,
}

impl RecordingClient {
    pub(crate) fn replies(&self) -> Vec<NewPost> {
        self.posts.lock().unwrap().clone()
    }

    pub(crate) fn emojis(&self) -> Vec<String> {
        self.reactions
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.emoji_name.clone())
            .collect()
    }

    pub(crate) fn reactions(&self) -> Vec<Reaction> {
        self.reactions.lock().unwrap().clone()
    }

    /// `(post_id, message)` of every patched post.
    pub(crate) fn patches(&self) -> Vec<(String, String)> {
        self.patches.lock().unwrap().clone()
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
            id: "created".to_string(),
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

    async fn patch_post(&self, post_id: &str, message: &str) -> Result<Post> {
        self.patches
            .lock()
            .unwrap()
            .push((post_id.to_string(), message.to_string()));
        Ok(Post {
            id: post_id.to_string(),
            channel_id: "chan1".to_string(),
            user_id: "someone".to_string(),
            root_id: String::new(),
            team_id: String::new(),
            message: message.to_string(),
            created_at: Utc::now(),
        })
    }
}

fn bot_user() -> User {
    User {
        id: BOT_ID.to_string(),
        username: "flobot".to_string(),
        first_name: None,
        last_name: None,
        is_bot: true,
    }
}

pub(crate) struct TestContext<S> {
    pub(crate) client: RecordingClient,
    config: Config,
    me: User,
    store: S,
    topics: Vec<HelpTopic>,
}

impl<S: Send + Sync> TestContext<S> {
    pub(crate) fn new(store: S) -> Self {
        Self {
            client: RecordingClient::default(),
            config: Config::new(
                "https://chat.example.com/api/v4",
                "wss://chat.example.com/api/v4/websocket",
                "token",
                "flobot",
                "debugchan",
            ),
            me: bot_user(),
            store,
            topics: Vec::new(),
        }
    }

    pub(crate) fn with_topics(mut self, topics: &[(&str, &str)]) -> Self {
        self.topics = topics
            .iter()
            .map(|(name, help)| HelpTopic {
                name: name.to_string(),
                help: help.to_string(),
            })
            .collect();
        self
    }
}

impl<S: Send + Sync> Context for TestContext<S> {
    type Store = S;

    fn store(&self) -> &S {
        &self.store
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

    fn help_topics(&self) -> Vec<HelpTopic> {
        self.topics.clone()
    }
}

pub(crate) fn posted_in(channel_id: &str, message: &str) -> Event {
    posted_by("someone", channel_id, message)
}

pub(crate) fn posted_by(user_id: &str, channel_id: &str, message: &str) -> Event {
    Event::Posted(Post {
        id: "p1".to_string(),
        channel_id: channel_id.to_string(),
        user_id: user_id.to_string(),
        root_id: String::new(),
        team_id: "team1".to_string(),
        message: message.to_string(),
        created_at: Utc::now(),
    })
}

pub(crate) fn posted(message: &str) -> Event {
    posted_in("chan1", message)
}
