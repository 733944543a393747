use anyhow::Result;
use clap::Parser;
use review_diff_config::AppConfig;

mod cli;
mod commands;
mod html;
mod input;
mod logger;
mod provider;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_file = logger::init(cli.log_level.map(|l| l.to_level_filter()))?;
    log::info!("Starting review-diff (log file {:?})", log_file);

    let config = AppConfig::load();

    let result = match cli.command {
        Commands::Render(args) => commands::render(args, &config).await,
        Commands::MarkViewed {
            review,
            diff,
            files,
            unmark,
        } => commands::mark_viewed(&review, &diff, &files, unmark),
        Commands::Status { review, diff } => commands::status(&review, &diff),
    };

    if let Err(e) = &result {
        log::error!("review-diff failed: {:#}", e);
    }
    log::info!("Exiting review-diff");
    result
}
