use clap::{Args, Subcommand};
use devhost::StartOptions;
use std::net::IpAddr;
use std::path::PathBuf;

/// Available Devhost subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the development server
    ///
    /// Resolves the project's bundler, installs dev tooling and serves until
    /// interrupted with Ctrl+C.
    Start(StartArgs),

    /// Print the resolved configuration
    ///
    /// Merges defaults, devhost.config.json, DEVHOST_* environment variables
    /// and flags, applies platform settings and prints the result as JSON.
    Config(ConfigArgs),
}

/// Arguments for the start command
#[derive(Args, Debug)]
pub struct StartArgs {
    /// Project root to serve
    #[arg(value_name = "PROJECT_ROOT", default_value = ".")]
    pub project_root: PathBuf,

    /// Port to listen on (0 picks a free port)
    #[arg(short, long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Address to bind
    #[arg(long, value_name = "HOST")]
    pub host: Option<IpAddr>,

    /// Maximum number of bundler workers
    #[arg(long, value_name = "N")]
    pub max_workers: Option<usize>,

    /// Clear the bundler cache before starting
    #[arg(long)]
    pub reset_cache: bool,
}

impl StartArgs {
    /// Flags as caller-supplied start options.
    pub fn start_options(&self) -> StartOptions {
        StartOptions {
            host: self.host,
            port: self.port,
            max_workers: self.max_workers,
            reset_cache: self.reset_cache,
        }
    }
}

/// Arguments for the config command
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Project root to inspect
    #[arg(value_name = "PROJECT_ROOT", default_value = ".")]
    pub project_root: PathBuf,
}
