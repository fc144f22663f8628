//! REST client for the Mattermost API v4; implements [`mbot_core::Client`].

use async_trait::async_trait;
use mbot_core::{Channel, Client, MbotError, NewPost, Post, Reaction, Result, User};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::models::{ApiChannel, ApiError, ApiPost, ApiPostPatch, ApiReaction, ApiUser};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Bearer-authenticated session against `api_url` (e.g. `https://chat.example.com/api/v4`).
#[derive(Clone)]
pub struct MattermostClient {
    http: reqwest::Client,
    api_url: String,
    token: String,
}

impl MattermostClient {
    pub fn new(api_url: &str, token: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| MbotError::Http(e.to_string()))?;
        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}/{}", self.api_url, path))
            .bearer_auth(&self.token)
    }

    /// Sends the request; non-2xx replies become [`MbotError::Api`] carrying the platform message.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request
            .send()
            .await
            .map_err(|e| MbotError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ApiError>(&body) {
                Ok(error) if !error.message.is_empty() => error.message,
                _ => body,
            };
            return Err(MbotError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| MbotError::Decode(e.to_string()))
    }
}

#[async_trait]
impl Client for MattermostClient {
    #[instrument(skip(self))]
    async fn me(&self) -> Result<User> {
        let user: ApiUser = self.send(self.request(Method::GET, "users/me")).await?;
        Ok(user.into())
    }

    #[instrument(skip(self, post), fields(channel_id = %post.channel_id))]
    async fn create_post(&self, post: &NewPost) -> Result<Post> {
        let created: ApiPost = self
            .send(self.request(Method::POST, "posts").json(post))
            .await?;
        debug!(post_id = %created.id, "post created");
        Ok(created.into_core(String::new()))
    }

    #[instrument(skip(self))]
    async fn channel(&self, channel_id: &str) -> Result<Channel> {
        let channel: ApiChannel = self
            .send(self.request(Method::GET, &format!("channels/{}", channel_id)))
            .await?;
        Ok(channel.into())
    }

    #[instrument(skip(self, reaction), fields(post_id = %reaction.post_id, emoji = %reaction.emoji_name))]
    async fn add_reaction(&self, reaction: &Reaction) -> Result<()> {
        let body = ApiReaction {
            user_id: reaction.user_id.clone(),
            post_id: reaction.post_id.clone(),
            emoji_name: reaction.emoji_name.clone(),
        };
        let _: serde_json::Value = self
            .send(self.request(Method::POST, "reactions").json(&body))
            .await?;
        Ok(())
    }

    #[instrument(skip(self, message))]
    async fn patch_post(&self, post_id: &str, message: &str) -> Result<Post> {
        let body = ApiPostPatch {
            message: message.to_string(),
        };
        let patched: ApiPost = self
            .send(
                self.request(Method::PUT, &format!("posts/{}/patch", post_id))
                    .json(&body),
            )
            .await?;
        debug!(post_id = %patched.id, "post patched");
        Ok(patched.into_core(String::new()))
    }
}
