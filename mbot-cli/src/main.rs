//! mbot: connect to Mattermost and run the stock chain. Config from env and optional CLI args.

use anyhow::Result;
use clap::Parser;
use mbot_cli::{run, Cli, Commands, Settings};
use mbot_core::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            token,
            database_url,
        } => {
            let settings = Settings::load(token, database_url)?;
            init_tracing(Some(&settings.log_file))?;
            run(settings).await
        }
    }
}
