//! Logs every event that reaches the handlers; useful while wiring a new chain.

use async_trait::async_trait;
use mbot_core::{Event, Handler, Result};
use tracing::debug;

pub struct DebugHandler;

#[async_trait]
impl<C> Handler<C> for DebugHandler
where
    C: Send + Sync + ?Sized,
{
    fn name(&self) -> &str {
        "debug"
    }

    async fn handle(&self, _ctx: &C, event: &Event) -> Result<()> {
        debug!(kind = %event.kind(), author = ?event.author(), event = ?event, "event");
        Ok(())
    }
}
