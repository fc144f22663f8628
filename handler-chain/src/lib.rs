//! # Handler chain
//!
//! Runs the middleware chain of an event in registration order, then every handler in
//! registration order. The first middleware that returns `false` or an error ends processing of
//! that event; a failing handler is logged and the next handler still runs.

use mbot_core::{Event, Handler, HelpTopic, Middleware};
use std::sync::Arc;
use tracing::{debug, error};

/// What happened to one event inside the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainOutcome {
    /// Middleware at this index returned `false`; nothing was logged.
    Filtered { middleware: usize },
    /// Middleware at this index failed; no handler ran.
    Rejected { middleware: usize },
    /// Every handler ran; indices of the handlers that returned an error.
    Dispatched { failed_handlers: Vec<usize> },
}

/// Ordered middleware and handlers, generic over the context passed to each stage.
pub struct HandlerChain<C: ?Sized> {
    middleware: Vec<Arc<dyn Middleware<C>>>,
    handlers: Vec<Arc<dyn Handler<C>>>,
}

impl<C: ?Sized> Clone for HandlerChain<C> {
    fn clone(&self) -> Self {
        Self {
            middleware: self.middleware.clone(),
            handlers: self.handlers.clone(),
        }
    }
}

impl<C: ?Sized> Default for HandlerChain<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ?Sized> HandlerChain<C> {
    /// Creates an empty chain (no middleware, no handlers).
    pub fn new() -> Self {
        Self {
            middleware: Vec::new(),
            handlers: Vec::new(),
        }
    }

    /// Appends a middleware; it runs after every middleware added before it.
    pub fn add_middleware(mut self, middleware: Arc<dyn Middleware<C>>) -> Self {
        self.middleware.push(middleware);
        self
    }

    /// Appends a handler; it runs after every handler added before it.
    pub fn add_handler(mut self, handler: Arc<dyn Handler<C>>) -> Self {
        self.handlers.push(handler);
        self
    }

    pub fn middleware_names(&self) -> Vec<&str> {
        self.middleware.iter().map(|m| m.name()).collect()
    }

    pub fn handler_names(&self) -> Vec<&str> {
        self.handlers.iter().map(|h| h.name()).collect()
    }

    /// Help of every handler that publishes one, in registration order.
    pub fn help_topics(&self) -> Vec<HelpTopic> {
        self.handlers
            .iter()
            .filter_map(|h| {
                h.help().map(|help| HelpTopic {
                    name: h.name().to_string(),
                    help,
                })
            })
            .collect()
    }

    /// Runs one event through the chain. Middleware see the event mutably; handlers see the
    /// event as left by the last middleware.
    pub async fn handle(&self, ctx: &C, mut event: Event) -> ChainOutcome {
        for (index, mw) in self.middleware.iter().enumerate() {
            match mw.process(ctx, &mut event).await {
                Ok(true) => continue,
                Ok(false) => return ChainOutcome::Filtered { middleware: index },
                Err(e) => {
                    error!(
                        middleware = index,
                        name = %mw.name(),
                        kind = %event.kind(),
                        error = %e,
                        "error from middleware, event dropped"
                    );
                    return ChainOutcome::Rejected { middleware: index };
                }
            }
        }

        let mut failed_handlers = Vec::new();
        for (index, handler) in self.handlers.iter().enumerate() {
            if let Err(e) = handler.handle(ctx, &event).await {
                error!(
                    handler = index,
                    name = %handler.name(),
                    kind = %event.kind(),
                    error = %e,
                    "error from handler"
                );
                failed_handlers.push(index);
            }
        }

        debug!(
            kind = %event.kind(),
            handlers = self.handlers.len(),
            failed = failed_handlers.len(),
            "event dispatched"
        );
        ChainOutcome::Dispatched { failed_handlers }
    }
}

// Unit/integration tests live in tests/handler_chain_test.rs
