//! school-bot binary.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use school_bot::config::DEFAULT_LOG_FILE;
use school_bot::{
    init_tracing, load_config, load_database_profile, run_bot, run_migrations_only,
    store_gdrive_token, Cli, Commands, StartupCheck,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { token } => {
            let config = load_config(token)?;
            run_bot(config, |bot| Arc::new(StartupCheck::new(bot))).await
        }
        Commands::Migrate => {
            init_tracing(&log_file())?;
            let profile = load_database_profile()?;
            let report = run_migrations_only(&profile).await?;
            println!(
                "Applied {} migration(s), {} total",
                report.applied, report.total
            );
            Ok(())
        }
        Commands::GdriveToken { token } => {
            init_tracing(&log_file())?;
            let profile = load_database_profile()?;
            store_gdrive_token(&profile, &token).await?;
            println!("Google Drive token stored");
            Ok(())
        }
    }
}

fn log_file() -> String {
    std::env::var("LOG_FILE").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string())
}
