//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Strata - layered code-unit loader
///
/// Resolves compiled units and resources from directory trees and zip
/// archives, the way an embedding runtime would.
#[derive(Parser, Debug)]
#[command(name = "strata")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "STRATA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Extra directory source, registered after configured ones
    #[arg(short, long = "dir", global = true)]
    pub dirs: Vec<PathBuf>,

    /// Extra archive source, registered after configured ones
    #[arg(short, long = "archive", global = true)]
    pub archives: Vec<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load units by name
    Load(LoadArgs),

    /// Resolve a resource
    Resource(ResourceArgs),

    /// List registered sources
    Sources(SourcesArgs),

    /// Show or edit configuration
    Config(ConfigArgs),
}

/// Arguments for the load command
#[derive(Parser, Debug)]
pub struct LoadArgs {
    /// Dotted unit names (e.g. org.example.Foo)
    #[arg(required = true)]
    pub names: Vec<String>,

    /// Ask the host to resolve dependencies eagerly
    #[arg(long)]
    pub resolve: bool,

    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the resource command
#[derive(Parser, Debug)]
pub struct ResourceArgs {
    /// Resource name (e.g. conf/app.toml)
    pub name: String,

    /// List every location instead of the first
    #[arg(long)]
    pub all: bool,

    /// Write the resource content to stdout
    #[arg(long, conflicts_with = "all")]
    pub cat: bool,
}

/// Arguments for the sources command
#[derive(Parser, Debug)]
pub struct SourcesArgs {
    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
}

/// Output format for listing commands
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Simple text (one per line)
    Plain,
}
