//! CLI argument definitions for pomstage.
//!
//! Uses `clap` derive macros to define the command surface. Each command
//! corresponds to a handler in the [`super::commands`] module.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use pomstage_core::config::OutputFormat;

#[derive(Parser, Debug)]
#[command(
    name = "pomstage",
    version,
    about = "Staged resolution of Maven project dependencies",
    long_about = "pomstage reads a Maven project descriptor, selects dependencies by scope or \
                  by explicit coordinate, narrows them with resolution strategies, and prints \
                  the resolved artifact list."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve the project's declared dependencies for a set of scopes
    Import {
        /// Project descriptor (defaults to the nearest pom.xml)
        #[arg(long, env = "POMSTAGE_POM")]
        pom: Option<PathBuf>,
        /// `test`, `defined`, or a comma-separated list of scopes
        #[arg(short, long, default_value = "defined")]
        scope: String,
        /// Reject `group:artifact` from the result (repeatable)
        #[arg(long)]
        reject: Vec<String>,
        /// Maven settings file
        #[arg(long, env = "POMSTAGE_SETTINGS")]
        settings: Option<PathBuf>,
        /// Output format
        #[arg(long, value_enum)]
        format: Option<FormatArg>,
    },

    /// Resolve explicit coordinates against the project's dependency management
    Resolve {
        /// Coordinates: group:artifact[:packaging[:classifier]][:version]
        #[arg(required = true)]
        coordinates: Vec<String>,
        /// Project descriptor (defaults to the nearest pom.xml)
        #[arg(long, env = "POMSTAGE_POM")]
        pom: Option<PathBuf>,
        /// Maven settings file
        #[arg(long, env = "POMSTAGE_SETTINGS")]
        settings: Option<PathBuf>,
        /// Output format
        #[arg(long, value_enum)]
        format: Option<FormatArg>,
    },

    /// Print the effective remote repositories
    Repos {
        /// Maven settings file
        #[arg(long, env = "POMSTAGE_SETTINGS")]
        settings: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatArg {
    Plain,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Plain => OutputFormat::Plain,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

/// Parse CLI arguments from the process environment.
pub fn parse() -> Cli {
    Cli::parse()
}
