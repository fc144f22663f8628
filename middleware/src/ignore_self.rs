use async_trait::async_trait;
use mbot_core::{Context, Event, Middleware, Result};
use tracing::trace;

/// Drops every event authored by the bot itself, so it never answers its own posts.
pub struct IgnoreSelf;

#[async_trait]
impl<C> Middleware<C> for IgnoreSelf
where
    C: Context + ?Sized,
{
    fn name(&self) -> &str {
        "ignore_self"
    }

    async fn process(&self, ctx: &C, event: &mut Event) -> Result<bool> {
        let own = event.author() == Some(ctx.me().id.as_str());
        if own {
            trace!(kind = %event.kind(), "own event ignored");
        }
        Ok(!own)
    }
}
