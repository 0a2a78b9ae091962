//! Command-line interface definition for Devhost.
//!
//! # Command Structure
//!
//! - `devhost start` - Bootstrap the dev server and serve until Ctrl+C
//! - `devhost config` - Print the resolved configuration as JSON

mod commands;

use clap::Parser;

pub use commands::{Command, ConfigArgs, StartArgs};

/// Devhost - development server bootstrap for bundler projects
#[derive(Parser, Debug)]
#[command(
    name = "devhost",
    version,
    about = "Start a bundler development server with dev tooling attached",
    long_about = "Devhost resolves the bundler installed in a project, loads its configuration,\n\
                  installs dev-tooling middleware and live-reload sockets, and starts the\n\
                  bundler's development server."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}
