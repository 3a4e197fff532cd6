//! trigger-bot: run (polling), serve (webhook) or set-webhook. Config from env and optional CLI args.

use anyhow::Result;
use clap::Parser;
use trigger_bot::{run_bot, serve, set_webhook, BotConfig, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { token } => run_bot(BotConfig::load(token)?).await,
        Commands::Serve { token, port } => serve(BotConfig::load(token)?, port).await,
        Commands::SetWebhook { token } => set_webhook(BotConfig::load(token)?).await,
    }
}
