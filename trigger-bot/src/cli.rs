//! CLI parser.

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "trigger-bot")]
#[command(about = "Keyword-trigger group guard bot for Telegram", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run with long polling (config from env; token can override BOT_TOKEN).
    Run {
        #[arg(short, long)]
        token: Option<String>,
    },
    /// Serve the webhook endpoint; registers the webhook on startup when BASE_URL is set.
    Serve {
        #[arg(short, long)]
        token: Option<String>,
        /// Overrides PORT.
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Register <BASE_URL>/webhook/<token> with Telegram and exit.
    SetWebhook {
        #[arg(short, long)]
        token: Option<String>,
    },
}
