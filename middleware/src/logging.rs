//! Logs every event reaching the chain; always continues.

use async_trait::async_trait;
use mbot_core::{Event, Middleware, Result};
use tracing::{info, instrument};

pub struct LoggingMiddleware;

#[async_trait]
impl<C> Middleware<C> for LoggingMiddleware
where
    C: Send + Sync + ?Sized,
{
    fn name(&self) -> &str {
        "logging"
    }

    #[instrument(skip(self, _ctx, event))]
    async fn process(&self, _ctx: &C, event: &mut Event) -> Result<bool> {
        match event.post() {
            Some(post) => info!(
                kind = %event.kind(),
                user_id = %post.user_id,
                channel_id = %post.channel_id,
                message_content = %post.message,
                "Received event"
            ),
            None => info!(
                kind = %event.kind(),
                author = ?event.author(),
                "Received event"
            ),
        }
        Ok(true)
    }
}
