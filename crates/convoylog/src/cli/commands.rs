//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::contacts::ContactKind;

/// Add command arguments.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Short title for the obstacle (e.g. "Pont abaissé D137")
    pub title: String,

    /// What the next convoy needs to know
    pub description: String,

    /// Latitude in decimal degrees (manual entry)
    #[arg(
        long,
        value_name = "DEGREES",
        allow_negative_numbers = true,
        requires = "lon",
        conflicts_with = "gps"
    )]
    pub lat: Option<String>,

    /// Longitude in decimal degrees (manual entry)
    #[arg(
        long,
        value_name = "DEGREES",
        allow_negative_numbers = true,
        requires = "lat",
        conflicts_with = "gps"
    )]
    pub lon: Option<String>,

    /// Attach the current GPS position
    #[arg(short, long)]
    pub gps: bool,
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Remove command arguments.
#[derive(Debug, Args)]
pub struct RemoveCommand {
    /// Identifier of the obstacle to delete (see `list`)
    pub id: String,
}

/// Clear command arguments.
#[derive(Debug, Args)]
pub struct ClearCommand {
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Contacts command arguments.
#[derive(Debug, Args)]
pub struct ContactsCommand {
    /// Only show contacts of this kind
    #[arg(short, long, value_enum)]
    pub kind: Option<ContactKindArg>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Locate command arguments.
#[derive(Debug, Args)]
pub struct LocateCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Contact kind argument for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ContactKindArg {
    /// Emergency numbers
    Urgence,
    /// Technical assistance
    SupportTechnique,
    /// Administrative contacts
    Administration,
}

impl From<ContactKindArg> for ContactKind {
    fn from(arg: ContactKindArg) -> Self {
        match arg {
            ContactKindArg::Urgence => Self::Urgence,
            ContactKindArg::SupportTechnique => Self::SupportTechnique,
            ContactKindArg::Administration => Self::Administration,
        }
    }
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// Formatted table
    Table,
    /// JSON output
    Json,
}
