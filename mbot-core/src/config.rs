//! Instance configuration: platform endpoints, credentials, identity and dispatch limits.
//! Loaded from env: BOT_API_URL, BOT_WS_URL, BOT_TOKEN, BOT_NAME, BOT_DEBUG_CHAN (all required),
//! BOT_MAX_IN_FLIGHT and BOT_DISPATCH_TIMEOUT_SECS (optional).

use crate::error::{MbotError, Result};
use reqwest::Url;
use std::env;
use std::time::Duration;

/// Default cap on concurrently running dispatch jobs.
pub const DEFAULT_MAX_IN_FLIGHT: usize = 64;

/// Upper bound for `max_in_flight`; the event loop drains by acquiring every permit at once.
pub const MAX_IN_FLIGHT_LIMIT: usize = u32::MAX as usize;

/// Immutable after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// REST base, e.g. `https://chat.example.com/api/v4`.
    pub api_url: String,
    /// Live connection, e.g. `wss://chat.example.com/api/v4/websocket`.
    pub ws_url: String,
    pub token: String,
    /// Display name used in the startup announcement.
    pub name: String,
    /// Channel id receiving announcements.
    pub debug_channel: String,
    pub max_in_flight: usize,
    /// Deadline for one event's pipeline; `None` lets jobs run to completion.
    pub dispatch_timeout: Option<Duration>,
}

impl Config {
    pub fn new(
        api_url: impl Into<String>,
        ws_url: impl Into<String>,
        token: impl Into<String>,
        name: impl Into<String>,
        debug_channel: impl Into<String>,
    ) -> Self {
        Self {
            api_url: api_url.into(),
            ws_url: ws_url.into(),
            token: token.into(),
            name: name.into(),
            debug_channel: debug_channel.into(),
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            dispatch_timeout: None,
        }
    }

    /// Loads from environment variables. `token` overrides BOT_TOKEN if provided.
    pub fn from_env(token: Option<String>) -> Result<Self> {
        let token = match token {
            Some(token) => token,
            None => required("BOT_TOKEN")?,
        };

        let max_in_flight = match env::var("BOT_MAX_IN_FLIGHT") {
            Ok(raw) => raw.parse().map_err(|_| {
                MbotError::Config(format!("BOT_MAX_IN_FLIGHT is not a number: {}", raw))
            })?,
            Err(_) => DEFAULT_MAX_IN_FLIGHT,
        };

        let dispatch_timeout = match env::var("BOT_DISPATCH_TIMEOUT_SECS") {
            Ok(raw) => Some(Duration::from_secs(raw.parse().map_err(|_| {
                MbotError::Config(format!("BOT_DISPATCH_TIMEOUT_SECS is not a number: {}", raw))
            })?)),
            Err(_) => None,
        };

        Ok(Self {
            api_url: required("BOT_API_URL")?,
            ws_url: required("BOT_WS_URL")?,
            token,
            name: required("BOT_NAME")?,
            debug_channel: required("BOT_DEBUG_CHAN")?,
            max_in_flight,
            dispatch_timeout,
        })
    }

    /// Checks URL schemes and dispatch limits.
    pub fn validate(&self) -> Result<()> {
        check_url("BOT_API_URL", &self.api_url, &["http", "https"])?;
        check_url("BOT_WS_URL", &self.ws_url, &["ws", "wss"])?;
        if self.max_in_flight == 0 {
            return Err(MbotError::Config(
                "BOT_MAX_IN_FLIGHT must be at least 1".to_string(),
            ));
        }
        if self.max_in_flight > MAX_IN_FLIGHT_LIMIT {
            return Err(MbotError::Config(format!(
                "BOT_MAX_IN_FLIGHT must be at most {}, got {}",
                MAX_IN_FLIGHT_LIMIT, self.max_in_flight
            )));
        }
        Ok(())
    }
}

fn required(name: &str) -> Result<String> {
    env::var(name).map_err(|_| MbotError::Config(format!("{} not set", name)))
}

fn check_url(name: &str, raw: &str, schemes: &[&str]) -> Result<()> {
    let url = Url::parse(raw)
        .map_err(|e| MbotError::Config(format!("{} is not a valid URL ({}): {}", name, e, raw)))?;
    if !schemes.contains(&url.scheme()) {
        return Err(MbotError::Config(format!(
            "{} must use one of {:?}, got {}",
            name,
            schemes,
            url.scheme()
        )));
    }
    Ok(())
}
