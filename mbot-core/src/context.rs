//! Processing stages and the view of the running bot they receive.
//!
//! A [`Middleware`] is a short-circuiting pre-filter that may rewrite the event in place; a
//! [`Handler`] is an independent reaction run once every middleware let the event through. Both
//! are generic over the context type so the pipeline can be exercised without a live platform.

use crate::client::Client;
use crate::config::Config;
use crate::error::Result;
use crate::types::{Event, User};
use async_trait::async_trait;

/// Read-only view of a running bot, handed to every middleware and handler.
pub trait Context: Send + Sync {
    type Store: Send + Sync;

    fn store(&self) -> &Self::Store;
    fn client(&self) -> &dyn Client;
    fn config(&self) -> &Config;
    /// The bot's own identity, fetched once at startup.
    fn me(&self) -> &User;

    /// Help published by the registered handlers, in registration order.
    fn help_topics(&self) -> Vec<HelpTopic> {
        Vec::new()
    }
}

/// Name and help text of one handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpTopic {
    pub name: String,
    pub help: String,
}

#[async_trait]
pub trait Middleware<C: ?Sized>: Send + Sync {
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Returns `Ok(false)` to drop the event silently, `Err` to drop it and log the failure.
    async fn process(&self, ctx: &C, event: &mut Event) -> Result<bool>;
}

#[async_trait]
pub trait Handler<C: ?Sized>: Send + Sync {
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Help text shown by `!help <name>`; handlers without one are not listed.
    fn help(&self) -> Option<String> {
        None
    }

    async fn handle(&self, ctx: &C, event: &Event) -> Result<()>;
}
