//! Tabload CLI - Main entry point

use clap::Parser;
use colored::Colorize;
use std::process;
use tabload_cli::{commands, Cli, Commands, Config};
use tabload_common::logging::{init_logging, LogConfig, LogLevel, LogOutput};
use tracing::error;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();

    // Verbose mode logs debug to the console; otherwise only warnings
    let log_config = LogConfig::builder()
        .level(if cli.verbose {
            LogLevel::Debug
        } else {
            LogLevel::Warn
        })
        .output(LogOutput::Console)
        .log_file_prefix("tabload")
        .build();

    // Environment variables take precedence
    let log_config = log_config.clone().merge_env().unwrap_or(log_config);

    // The CLI works without logging
    let _ = init_logging(&log_config);

    if let Err(e) = execute_command(&cli).await {
        error!(error = %e, "Command failed");
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(e.exit_code());
    }
}

/// Execute the CLI command
async fn execute_command(cli: &Cli) -> tabload_cli::Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;

    match &cli.command {
        Commands::Run {
            source,
            remote,
            batch_size,
        } => {
            source.apply(&mut config);
            remote.apply(&mut config);
            if let Some(size) = batch_size {
                config.batch_size = *size;
            }
            let collection = remote.collection(&config);
            commands::run::run(&config, &collection).await.map(|_| ())
        },

        Commands::Preview { source, limit } => {
            source.apply(&mut config);
            commands::preview::run(&config, *limit)
        },

        Commands::Validate { source, remote } => {
            source.apply(&mut config);
            remote.apply(&mut config);
            let collection = remote.collection(&config);
            commands::validate::run(&config, &collection).await
        },
    }
}
