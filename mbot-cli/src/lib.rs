//! # mbot-cli
//!
//! Command-line entry: argument parsing, binary settings and wiring of the stock chain.

pub mod cli;
pub mod runner;

pub use cli::{Cli, Commands, Settings};
pub use runner::run;
