//! Wires the stock chain onto a bootstrapped instance and runs it.

use std::sync::Arc;

use anyhow::{Context, Result};
use handlers::{DebugHandler, EditHandler, HelpHandler, TriggerHandler};
use mattermost::{bootstrap, InstanceBuilder};
use mbot_core::Context as _;
use middleware::{EventFilter, IgnoreSelf, LoggingMiddleware, NormalizeMessage};
use storage::BotStore;
use tracing::{info, instrument};

use crate::cli::Settings;

/// Registers the stock middlewares and handlers, in order.
pub fn register(
    builder: InstanceBuilder<BotStore>,
    settings: &Settings,
) -> Result<InstanceBuilder<BotStore>> {
    let trigger = TriggerHandler::new(settings.trigger_delay).context("Build trigger handler")?;
    let edit = EditHandler::new().context("Build edit handler")?;

    Ok(builder
        .add_middleware(Arc::new(IgnoreSelf))
        .add_middleware(Arc::new(EventFilter::posts()))
        .add_middleware(Arc::new(NormalizeMessage))
        .add_middleware(Arc::new(LoggingMiddleware))
        .add_handler(Arc::new(DebugHandler))
        .add_handler(Arc::new(HelpHandler))
        .add_handler(Arc::new(edit))
        .add_handler(Arc::new(trigger)))
}

/// Opens the bot database, bootstraps the instance and runs until the live connection ends.
///
/// Returns only with an error: a failed startup step, or the closed connection.
#[instrument(skip(settings), fields(name = %settings.config.name))]
pub async fn run(settings: Settings) -> Result<()> {
    info!(database_url = %settings.database_url, "Initializing bot");

    let store = BotStore::open(&settings.database_url)
        .await
        .with_context(|| format!("Open bot database {}", settings.database_url))?;

    let builder = bootstrap(settings.config.clone(), store)
        .await
        .context("Bootstrap Mattermost instance")?;
    let (instance, events) = register(builder, &settings)?.build();

    info!(username = %instance.me().username, "Bot started successfully");

    match instance.run(events).await {
        Ok(never) => match never {},
        Err(e) => Err(anyhow::Error::new(e).context("Event loop stopped")),
    }
}
