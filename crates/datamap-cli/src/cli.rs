//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API.

use clap::{Parser, Subcommand, ValueEnum};
use datamap_core::KeyRename;
use is_terminal::IsTerminal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// datamap - turn loosely-structured JSON/YAML records into typed records
///
/// Flattens nested objects, normalizes keys to snake_case, applies renames
/// and removals, and converts field values according to declared types.
#[derive(Parser, Debug)]
#[command(
    name = "datamap",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "DATAMAP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format for results [default: json-pretty, or `output.format` from the config]
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Materialize records through a mapping profile
    Map(MapArgs),

    /// Flatten nested records into single-level records
    Flatten(FlattenArgs),

    /// Inspect the effective configuration
    Config(ConfigArgs),

    /// Generate shell completions for the specified shell
    Completions(CompletionsArgs),
}

/// Arguments for the map command
#[derive(Parser, Debug)]
pub struct MapArgs {
    /// Input file (JSON or YAML); reads stdin when omitted or `-`
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Read the input as JSON Lines, one record per line
    #[arg(long)]
    pub lines: bool,

    /// Mapping profile from the configuration file
    #[arg(short, long, value_name = "NAME", env = "DATAMAP_PROFILE")]
    pub profile: Option<String>,

    /// Flatten nested objects before mapping
    #[arg(long)]
    pub flatten: bool,

    /// Rename a key after normalization (repeatable)
    #[arg(long = "rename", value_name = "OLD=NEW")]
    pub renames: Vec<KeyRename>,

    /// Drop a key after renaming (repeatable)
    #[arg(long = "remove", value_name = "KEY")]
    pub removes: Vec<String>,

    /// Skip renamed keys whose value is null or missing
    #[arg(long)]
    pub suppress_null: bool,

    /// Target type from the configuration's `types` section
    #[arg(short = 't', long = "type", value_name = "NAME", conflicts_with = "discriminator")]
    pub type_name: Option<String>,

    /// Discover the target type from this record key
    #[arg(long, value_name = "KEY")]
    pub discriminator: Option<String>,

    /// Output file path (stdout if not specified)
    #[arg(long = "save-to", value_name = "FILE")]
    pub output_file: Option<PathBuf>,
}

/// Arguments for the flatten command
#[derive(Parser, Debug)]
pub struct FlattenArgs {
    /// Input file (JSON or YAML); reads stdin when omitted or `-`
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Join nested keys with this separator instead of camel-casing them
    #[arg(short, long, value_name = "SEP")]
    pub separator: Option<String>,

    /// Output file path (stdout if not specified)
    #[arg(long = "save-to", value_name = "FILE")]
    pub output_file: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration values
    Show(ConfigShowArgs),

    /// List available mapping profiles
    Profiles,

    /// Validate current configuration
    Validate,
}

#[derive(Parser, Debug)]
pub struct ConfigShowArgs {
    /// Show configuration in specified format
    #[arg(short, long, value_enum, default_value = "yaml")]
    pub format: ConfigFormat,
}

/// Configuration file formats
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ConfigFormat {
    Toml,
    Json,
    Yaml,
}

/// Arguments for generating shell completions
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Output format options
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Compact JSON; one document per line for JSON Lines input
    Json,
    /// Pretty-printed JSON output
    #[default]
    JsonPretty,
    /// YAML output
    Yaml,
}

/// Supported shells for completion generation
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level (considering quiet flag)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used for messages on stderr
    pub fn use_color(&self, configured: bool) -> bool {
        !self.no_color && configured && std::io::stderr().is_terminal()
    }
}

impl Shell {
    pub fn to_clap_shell(self) -> clap_complete::Shell {
        match self {
            Shell::Bash => clap_complete::Shell::Bash,
            Shell::Zsh => clap_complete::Shell::Zsh,
            Shell::Fish => clap_complete::Shell::Fish,
            Shell::PowerShell => clap_complete::Shell::PowerShell,
            Shell::Elvish => clap_complete::Shell::Elvish,
        }
    }
}
