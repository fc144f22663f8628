//! `!help` lists the handlers that publish help; `!help <name>` shows one of them.

use async_trait::async_trait;
use mbot_core::{Context, Event, Handler, Result};
use tracing::{debug, instrument};

pub struct HelpHandler;

impl HelpHandler {
    fn reply_for<C: Context + ?Sized>(ctx: &C, message: &str) -> Option<String> {
        let mut words = message.split_whitespace();
        if words.next() != Some("!help") {
            return None;
        }

        let topics = ctx.help_topics();
        match words.next() {
            None => {
                let mut names: Vec<&str> = topics.iter().map(|t| t.name.as_str()).collect();
                names.sort_unstable();
                if names.is_empty() {
                    return Some("no help available".to_string());
                }
                Some(names.iter().map(|name| format!("`{}`\n", name)).collect())
            }
            Some(name) => Some(
                topics
                    .into_iter()
                    .find(|t| t.name == name)
                    .map(|t| t.help)
                    .unwrap_or_else(|| format!("unknown help topic: {}", name)),
            ),
        }
    }
}

#[async_trait]
impl<C> Handler<C> for HelpHandler
where
    C: Context + ?Sized,
{
    fn name(&self) -> &str {
        "help"
    }

    #[instrument(skip(self, ctx, event))]
    async fn handle(&self, ctx: &C, event: &Event) -> Result<()> {
        let Event::Posted(post) = event else {
            return Ok(());
        };
        let Some(reply) = Self::reply_for(ctx, &post.message) else {
            return Ok(());
        };

        debug!(channel_id = %post.channel_id, "answering help request");
        ctx.client().reply(post, &reply).await?;
        Ok(())
    }
}
