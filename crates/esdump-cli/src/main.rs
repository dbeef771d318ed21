//! esdump CLI - Main entry point

use clap::{CommandFactory, Parser};
use esdump_cli::{commands, Cli, Commands, Config};
use esdump_common::logging::{init_logging, LogConfig, LogLevel, LogOutput};
use std::process;
use tracing::error;

#[tokio::main]
async fn main() {
    // Environment from .env, if present
    let _ = dotenvy::dotenv();

    // Parse command-line arguments
    let cli = Cli::parse();

    // Handle markdown help generation
    if cli.markdown_help {
        println!("{}", clap_markdown::help_markdown::<Cli>());
        return;
    }

    // Ensure a command is provided
    let Some(command) = cli.command.as_ref() else {
        eprintln!("Error: A subcommand is required");
        eprintln!();
        let _ = Cli::command().print_help();
        process::exit(2);
    };

    // Verbose mode logs debug to the console, otherwise only warnings
    let level = if cli.verbose { LogLevel::Debug } else { LogLevel::Warn };
    let log_config = LogConfig::builder()
        .level(level)
        .output(LogOutput::Console)
        .log_file_prefix("esdump")
        .build();

    // Merge with environment variables (they take precedence)
    let log_config = log_config.clone().with_env().unwrap_or(log_config);

    // Keep the guard alive so buffered file logs are flushed on exit
    let guard = init_logging(&log_config).ok().flatten();

    if let Err(e) = execute_command(command).await {
        error!(error = %e, "Command failed");
        eprintln!("Error: {}", e);
        drop(guard);
        process::exit(1);
    }
}

/// Execute the CLI command
async fn execute_command(command: &Commands) -> esdump_cli::Result<()> {
    let config = Config::from_env()?;

    match command {
        Commands::Transfer(args) => commands::transfer::run(args, config).await,
        Commands::Backup(args) => commands::backup::run(args, config).await,
        Commands::Restore(args) => commands::restore::run(args, config).await,
    }
}
