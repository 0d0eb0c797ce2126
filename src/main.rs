//! Strata - layered code-unit loader
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use std::process::ExitCode;
use std::sync::Arc;
use strata::cli::{Cli, Commands};
use strata::config::{Config, ConfigManager};
use strata::error::StrataResult;
use strata::loader::{NoHost, UnitLoader};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> StrataResult<()> {
    let cli = Cli::parse();

    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let config = config_manager.load().await?;

    init_logging(cli.verbose, &config);
    debug!("Using config {}", config_manager.path().display());

    // Config command doesn't need any sources
    if let Commands::Config(args) = cli.command {
        return strata::cli::commands::config(args, &config, &config_manager).await;
    }

    let loader = build_loader(&config, &cli)?;

    match cli.command {
        Commands::Config(_) => unreachable!("Config handled above"),
        Commands::Load(args) => strata::cli::commands::load(args, &loader).await,
        Commands::Resource(args) => strata::cli::commands::resource(args, &loader).await,
        Commands::Sources(args) => strata::cli::commands::sources(args, &loader).await,
    }
}

/// 0 = warn, 1 = info, 2+ = debug
fn init_logging(verbose: u8, config: &Config) {
    let filter = match verbose {
        0 => EnvFilter::new("strata=warn"),
        1 => EnvFilter::new("strata=info"),
        _ => EnvFilter::new("strata=debug"),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if config.general.log_format == "json" {
        builder.json().init();
    } else {
        builder.without_time().init();
    }
}

fn build_loader(config: &Config, cli: &Cli) -> StrataResult<UnitLoader> {
    let loader = UnitLoader::from_config(config, Arc::new(NoHost))?;
    for dir in &cli.dirs {
        loader.register_directory(dir)?;
    }
    for archive in &cli.archives {
        loader.register_archive_path(archive)?;
    }
    Ok(loader)
}
