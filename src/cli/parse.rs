//! CLI parse: clap types for AgentFlow. No behavior; definitions only.

use crate::types::Field;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// AgentFlow CLI - listing, caption and subject-line generation
#[derive(Parser)]
#[command(name = "agentflow")]
#[command(about = "Generate listing descriptions, social captions and email subject lines")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory (config/ is read from here)
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (default: off)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate all three fields from a property description
    Generate {
        /// Property description
        #[arg(long)]
        text: String,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Generate a single field from a property description
    Regenerate {
        /// Field to generate (listing, caption, subject)
        #[arg(long)]
        field: Field,
        /// Property description
        #[arg(long)]
        text: String,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Interactive session: describe, generate, regenerate and edit fields
    Session,
    /// Configuration commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration as TOML
    Show,
    /// Print the global configuration file location
    Path,
}
