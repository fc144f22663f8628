//! Instance lifecycle: bootstrap a session, register the chain on an [`InstanceBuilder`], then
//! consume it into a running [`Instance`] whose chain can no longer change.

use handler_chain::{ChainOutcome, HandlerChain};
use mbot_core::config::MAX_IN_FLIGHT_LIMIT;
use mbot_core::{
    Client, Config, Context, Event, Handler, HelpTopic, MbotError, Middleware, NewPost, Post,
    Result, User,
};
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{info, instrument, warn};

use crate::client::MattermostClient;
use crate::websocket::{self, EventStream};

/// Connects to the platform and returns a builder ready for chain registration.
///
/// Steps, each depending on the previous one: validate config, build the REST session, fetch
/// the bot's own identity, open the live connection, announce on the debug channel. Any failure
/// is returned as is; callers treat it as fatal.
#[instrument(skip(config, store), fields(name = %config.name))]
pub async fn bootstrap<S>(config: Config, store: S) -> Result<InstanceBuilder<S>>
where
    S: Send + Sync + 'static,
{
    config.validate()?;
    let client: Arc<dyn Client> = Arc::new(MattermostClient::new(&config.api_url, &config.token)?);

    let me = client.me().await?;
    info!(user_id = %me.id, username = %me.username, "step: identity fetched");

    let events = websocket::connect(&config.ws_url, &config.token).await?;
    info!(ws_url = %config.ws_url, "step: live connection established");

    let announce = NewPost::new(
        config.debug_channel.clone(),
        format!("bot {} is up", config.name),
    );
    client.create_post(&announce).await?;
    info!(channel_id = %config.debug_channel, "step: startup announced");

    Ok(InstanceBuilder::new(config, store, client, me, events))
}

/// A connected instance still accepting middleware and handlers.
pub struct InstanceBuilder<S: Send + Sync + 'static> {
    config: Config,
    client: Arc<dyn Client>,
    me: User,
    store: S,
    events: EventStream,
    chain: HandlerChain<Instance<S>>,
}

impl<S: Send + Sync + 'static> InstanceBuilder<S> {
    /// Assembles a builder from an already established session.
    pub fn new(
        config: Config,
        store: S,
        client: Arc<dyn Client>,
        me: User,
        events: EventStream,
    ) -> Self {
        Self {
            config,
            client,
            me,
            store,
            events,
            chain: HandlerChain::new(),
        }
    }

    pub fn me(&self) -> &User {
        &self.me
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Appends a middleware; middleware run in registration order.
    pub fn add_middleware(mut self, middleware: Arc<dyn Middleware<Instance<S>>>) -> Self {
        self.chain = self.chain.add_middleware(middleware);
        self
    }

    /// Appends a handler; handlers run in registration order.
    pub fn add_handler(mut self, handler: Arc<dyn Handler<Instance<S>>>) -> Self {
        self.chain = self.chain.add_handler(handler);
        self
    }

    /// Freezes the chain. The returned instance has no registration methods.
    pub fn build(self) -> (Arc<Instance<S>>, EventStream) {
        let instance = Instance {
            config: self.config,
            client: self.client,
            me: self.me,
            store: self.store,
            chain: self.chain,
        };
        (Arc::new(instance), self.events)
    }

    /// Builds and runs the event loop. See [`Instance::run`].
    pub async fn run(self) -> Result<Infallible> {
        let (instance, events) = self.build();
        instance.run(events).await
    }
}

/// A running instance: configuration, session, identity, store and a frozen chain.
///
/// Registration is only possible on [`InstanceBuilder`]:
///
/// ```compile_fail
/// use std::sync::Arc;
/// use mattermost::Instance;
/// use mbot_core::Middleware;
///
/// fn register(instance: Arc<Instance<()>>, middleware: Arc<dyn Middleware<Instance<()>>>) {
///     instance.add_middleware(middleware);
/// }
/// ```
pub struct Instance<S: Send + Sync + 'static> {
    config: Config,
    client: Arc<dyn Client>,
    me: User,
    store: S,
    chain: HandlerChain<Instance<S>>,
}

impl<S: Send + Sync + 'static> Context for Instance<S> {
    type Store = S;

    fn store(&self) -> &S {
        &self.store
    }

    fn client(&self) -> &dyn Client {
        self.client.as_ref()
    }

    fn config(&self) -> &Config {
        &self.config
    }

    fn me(&self) -> &User {
        &self.me
    }

    fn help_topics(&self) -> Vec<HelpTopic> {
        self.chain.help_topics()
    }
}

impl<S: Send + Sync + 'static> Instance<S> {
    /// Runs one event through the middleware and handler chain.
    pub async fn handle(&self, event: Event) -> ChainOutcome {
        self.chain.handle(self, event).await
    }

    /// Posts `text` to the configured debug channel.
    pub async fn debug(&self, text: &str) -> Result<Post> {
        let post = NewPost::new(self.config.debug_channel.clone(), text);
        self.client.create_post(&post).await
    }

    /// Consumes events until the live connection ends, dispatching each on its own task.
    ///
    /// Before the first event, the loaded chain is posted to the debug channel. Middleware
    /// rejections, handler failures and timeouts are reported there as well; a failed report is
    /// only logged.
    ///
    /// At most `max_in_flight` dispatch jobs run at once; when the cap is reached the loop waits
    /// for a slot, which back-pressures the connection reader. Events are not ordered relative to
    /// each other. When the connection ends, in-flight jobs are drained and
    /// [`MbotError::ConnectionClosed`] is returned; there is no reconnection.
    pub async fn run(self: Arc<Self>, mut events: EventStream) -> Result<Infallible> {
        let max_in_flight = self.config.max_in_flight.clamp(1, MAX_IN_FLIGHT_LIMIT);
        let limiter = Arc::new(Semaphore::new(max_in_flight));

        info!(
            middlewares = ?self.chain.middleware_names(),
            handlers = ?self.chain.handler_names(),
            max_in_flight,
            "instance running"
        );
        if let Err(e) = self.debug(&self.loaded_summary()).await {
            warn!(error = %e, "could not post loaded chain to debug channel");
        }

        while let Some(event) = events.recv().await {
            let permit = match Arc::clone(&limiter).acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => break,
            };
            let instance = Arc::clone(&self);
            tokio::spawn(async move {
                instance.dispatch(event).await;
                drop(permit);
            });
        }

        let reason = events.close_reason().await;
        warn!(reason = %reason, "live connection ended, draining in-flight events");
        let all = u32::try_from(max_in_flight).unwrap_or(u32::MAX);
        let _drained = limiter.acquire_many(all).await;

        Err(MbotError::ConnectionClosed(reason))
    }

    /// Markdown listing of the frozen chain, in registration order.
    pub fn loaded_summary(&self) -> String {
        let mut text = String::from("## Loaded middlewares\n");
        for name in self.chain.middleware_names() {
            text.push_str(&format!("- {}\n", name));
        }
        text.push_str("\n## Loaded post handlers\n");
        for name in self.chain.handler_names() {
            text.push_str(&format!("- {}\n", name));
        }
        text
    }

    async fn dispatch(&self, event: Event) {
        let kind = event.kind().to_string();
        let outcome = match self.config.dispatch_timeout {
            Some(limit) => match tokio::time::timeout(limit, self.handle(event)).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    warn!(
                        kind = %kind,
                        timeout_ms = limit.as_millis() as u64,
                        "event dispatch timed out, job dropped"
                    );
                    self.report(format!("error: {} event timed out after {:?}", kind, limit))
                        .await;
                    return;
                }
            },
            None => self.handle(event).await,
        };

        if let Some(report) = self.failure_report(&kind, &outcome) {
            self.report(report).await;
        }
    }

    /// Debug-channel text for a chain outcome that contains failures.
    fn failure_report(&self, kind: &str, outcome: &ChainOutcome) -> Option<String> {
        match outcome {
            ChainOutcome::Filtered { .. } => None,
            ChainOutcome::Rejected { middleware } => {
                let names = self.chain.middleware_names();
                let name = names.get(*middleware).copied().unwrap_or("?");
                Some(format!(
                    "error: middleware `{}` rejected a {} event",
                    name, kind
                ))
            }
            ChainOutcome::Dispatched { failed_handlers } if failed_handlers.is_empty() => None,
            ChainOutcome::Dispatched { failed_handlers } => {
                let names = self.chain.handler_names();
                let failed: Vec<String> = failed_handlers
                    .iter()
                    .map(|i| format!("`{}`", names.get(*i).copied().unwrap_or("?")))
                    .collect();
                Some(format!(
                    "error: handler {} failed on a {} event",
                    failed.join(", "),
                    kind
                ))
            }
        }
    }

    async fn report(&self, text: String) {
        if let Err(e) = self.debug(&text).await {
            warn!(error = %e, "could not report to debug channel");
        }
    }
}
