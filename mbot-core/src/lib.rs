//! # mbot-core
//!
//! Core types and traits for the chat bot: [`Client`], [`Context`], [`Middleware`], [`Handler`],
//! event and user types, configuration and tracing initialization. Transport-agnostic; used by
//! mattermost, handler-chain, middleware and handlers.

pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod logger;
pub mod types;

pub use client::Client;
pub use config::Config;
pub use context::{Context, Handler, HelpTopic, Middleware};
pub use error::{HandlerError, MbotError, Result};
pub use logger::init_tracing;
pub use types::{Channel, Event, NewPost, Post, Reaction, User};
