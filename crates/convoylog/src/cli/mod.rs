//! Command-line interface for convoylog.
//!
//! This module provides the CLI structure and output helpers for the
//! `convoylog` binary.

mod commands;

use std::path::PathBuf;

use chrono::{DateTime, Datelike, TimeZone, Timelike};
use clap::{Parser, Subcommand};

pub use commands::{
    AddCommand, ClearCommand, ConfigCommand, ContactKindArg, ContactsCommand, ListCommand,
    LocateCommand, OutputFormat, RemoveCommand, StatusCommand,
};

/// convoylog - Road obstacle log for oversize-load convoys
///
/// Records the obstacles a convoy encounters along its route (with an
/// optional GPS or manually entered position), keeps them in a local
/// database, and carries the emergency contact directory for the route.
#[derive(Debug, Parser)]
#[command(name = "convoylog")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Record a new obstacle
    Add(AddCommand),

    /// List recorded obstacles
    List(ListCommand),

    /// Delete one obstacle by identifier
    Remove(RemoveCommand),

    /// Delete every recorded obstacle
    Clear(ClearCommand),

    /// Show the emergency contact directory
    Contacts(ContactsCommand),

    /// Read the current GPS position
    Locate(LocateCommand),

    /// Show database and GPS status
    Status(StatusCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}

/// French month names, indexed by zero-based month.
const FRENCH_MONTHS: [&str; 12] = [
    "janvier",
    "février",
    "mars",
    "avril",
    "mai",
    "juin",
    "juillet",
    "août",
    "septembre",
    "octobre",
    "novembre",
    "décembre",
];

/// Format a timestamp the way the log displays creation dates.
///
/// Produces `"15 janvier 2024 à 10:30"`: day without leading zero, French
/// month name, four-digit year, then the time with two-digit hour and
/// minute. Works for any timezone; the caller picks the one to display.
#[must_use]
pub fn format_date_fr<Tz: TimeZone>(timestamp: &DateTime<Tz>) -> String {
    let month = FRENCH_MONTHS
        .get(timestamp.month0() as usize)
        .copied()
        .unwrap_or("");
    format!(
        "{} {} {} à {:02}:{:02}",
        timestamp.day(),
        month,
        timestamp.year(),
        timestamp.hour(),
        timestamp.minute()
    )
}
