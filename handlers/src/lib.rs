//! # Handlers for mbot
//!
//! This crate provides handler implementations: `!help`, per-team triggers, message edits and
//! debug logging, plus [`Tempo`], the expiring key set used for rate limiting.

mod debug;
mod edit;
mod help;
mod tempo;
mod trigger;

#[cfg(test)]
mod test;

pub use debug::DebugHandler;
pub use edit::EditHandler;
pub use help::HelpHandler;
pub use tempo::Tempo;
pub use trigger::{valid_match, TriggerHandler, DEFAULT_DELAY_REPEAT};
