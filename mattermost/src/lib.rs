//! # mattermost
//!
//! Mattermost layer: wire models and adapters, REST [`MattermostClient`], live WebSocket
//! [`EventStream`], instance bootstrap and the event loop. Knows nothing about what the bot does
//! with events; that lives in the middleware and handlers registered on the [`InstanceBuilder`].

mod adapters;
mod client;
mod instance;
mod models;
mod websocket;

pub use adapters::{decode_frame, Frame};
pub use client::MattermostClient;
pub use instance::{bootstrap, Instance, InstanceBuilder};
pub use models::StatusReply;
pub use websocket::{connect, EventStream, EVENT_BUFFER};
