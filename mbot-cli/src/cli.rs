//! CLI parser and binary-only settings.

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use handlers::DEFAULT_DELAY_REPEAT;
use mbot_core::Config;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://mbot.db";
pub const DEFAULT_LOG_FILE: &str = "logs/mbot.log";

#[derive(Parser)]
#[command(name = "mbot")]
#[command(about = "Mattermost bot CLI", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the bot (config from env; token can override BOT_TOKEN).
    Run {
        #[arg(short, long)]
        token: Option<String>,
        /// Bot database (triggers and edits); overrides DATABASE_URL.
        #[arg(long)]
        database_url: Option<String>,
    },
}

/// Everything the binary needs: the instance config plus storage, logging and trigger settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub config: Config,
    pub database_url: String,
    pub log_file: String,
    pub trigger_delay: Duration,
}

impl Settings {
    /// Loads from env: the instance variables, then DATABASE_URL, LOG_FILE and
    /// BOT_TRIGGER_DELAY_SECS with defaults. CLI values win over env.
    pub fn load(token: Option<String>, database_url: Option<String>) -> Result<Self> {
        let config = Config::from_env(token).context("Load instance config from env")?;

        let database_url = database_url
            .or_else(|| env::var("DATABASE_URL").ok())
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let log_file = env::var("LOG_FILE").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());
        let trigger_delay = match env::var("BOT_TRIGGER_DELAY_SECS") {
            Ok(raw) => Duration::from_secs(
                raw.parse()
                    .with_context(|| format!("BOT_TRIGGER_DELAY_SECS is not a number: {}", raw))?,
            ),
            Err(_) => DEFAULT_DELAY_REPEAT,
        };

        Ok(Self {
            config,
            database_url,
            log_file,
            trigger_delay,
        })
    }
}
