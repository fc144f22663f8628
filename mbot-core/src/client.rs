//! REST abstraction over the chat platform.
//!
//! [`Client`] is transport-agnostic; the mattermost crate implements it over HTTP. Tests substitute
//! an in-memory implementation.

use crate::error::Result;
use crate::types::{Channel, NewPost, Post, Reaction, User};
use async_trait::async_trait;

/// Authenticated calls against the platform API.
#[async_trait]
pub trait Client: Send + Sync {
    /// Fetches the user the session is authenticated as.
    async fn me(&self) -> Result<User>;
    /// Creates a post and returns it as stored by the platform.
    async fn create_post(&self, post: &NewPost) -> Result<Post>;
    /// Fetches a channel by id.
    async fn channel(&self, channel_id: &str) -> Result<Channel>;
    /// Adds an emoji reaction on behalf of `reaction.user_id`.
    async fn add_reaction(&self, reaction: &Reaction) -> Result<()>;
    /// Replaces the message of an existing post and returns it as stored.
    async fn patch_post(&self, post_id: &str, message: &str) -> Result<Post>;

    /// Replies in the thread of `post`.
    async fn reply(&self, post: &Post, text: &str) -> Result<Post> {
        let reply = NewPost::new(post.channel_id.clone(), text).in_thread(post.thread_root());
        self.create_post(&reply).await
    }

    /// Reacts to `post` with `emoji` (name without colons) as `user_id`.
    async fn react(&self, user_id: &str, post: &Post, emoji: &str) -> Result<()> {
        let reaction = Reaction {
            user_id: user_id.to_string(),
            post_id: post.id.clone(),
            emoji_name: emoji.trim_matches(':').to_string(),
        };
        self.add_reaction(&reaction).await
    }
}
