use async_trait::async_trait;
use mbot_core::{Event, Middleware, Result};

/// Trims surrounding whitespace from post messages in place; later stages see the trimmed text.
pub struct NormalizeMessage;

#[async_trait]
impl<C> Middleware<C> for NormalizeMessage
where
    C: Send + Sync + ?Sized,
{
    fn name(&self) -> &str {
        "normalize_message"
    }

    async fn process(&self, _ctx: &C, event: &mut Event) -> Result<bool> {
        if let Some(post) = event.post_mut() {
            let trimmed = post.message.trim();
            if trimmed.len() != post.message.len() {
                post.message = trimmed.to_string();
            }
        }
        Ok(true)
    }
}
