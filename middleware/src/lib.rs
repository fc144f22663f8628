//! # Middlewares for mbot
//!
//! Stock pre-filters run by the handler chain before any handler: dropping the bot's own events,
//! keeping selected event kinds, normalising message text, and logging.

mod event_filter;
mod ignore_self;
mod logging;
mod normalize;

#[cfg(test)]
mod test;

pub use event_filter::EventFilter;
pub use ignore_self::IgnoreSelf;
pub use logging::LoggingMiddleware;
pub use normalize::NormalizeMessage;
