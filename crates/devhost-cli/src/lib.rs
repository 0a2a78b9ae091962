//! Devhost CLI - start a bundler dev server with dev tooling attached.
//!
//! This crate supplies the concrete collaborators the `devhost` bootstrap
//! drives, plus the command-line surface around them.
//!
//! # Architecture
//!
//! - [`error`] - CLI error types and miette conversion
//! - [`logger`] - Structured logging with tracing
//! - [`ui`] - Status lines, colours and the transform progress bar
//! - [`reporter`] - Terminal rendering of bundler events
//! - [`config`] - `devhost.config.json` / environment / flag layering
//! - [`bundler`] - The local axum-backed bundler server
//! - [`devtools`] - Message and events sockets plus status endpoints
//! - [`collaborators`] - Wiring of everything above for one project
//! - `commands` - Individual CLI command implementations
//!
//! # Example
//!
//! ```rust,no_run
//! use devhost::{DevEnvironment, ServerLauncher, StartOptions};
//! use devhost_cli::{collaborators, reporter::TerminalReporter};
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! # async fn run() -> devhost::Result<()> {
//! let root = Path::new("./my-app");
//! let env = DevEnvironment::from_process();
//! let launcher = ServerLauncher::new(
//!     collaborators::for_project(root, &env),
//!     Arc::new(TerminalReporter::new()),
//! )
//! .with_environment(env);
//! let handle = launcher.bootstrap(root, StartOptions::default()).await?;
//! println!("{}", handle.server.url());
//! # Ok(())
//! # }
//! ```

pub mod bundler;
pub mod cli;
pub mod collaborators;
pub mod commands;
pub mod config;
pub mod devtools;
pub mod error;
pub mod logger;
pub mod platforms;
pub mod project;
pub mod reporter;
pub mod resolve;
pub mod telemetry;
pub mod ui;
pub mod watcher;

pub use error::{CliError, ConfigError, Result, ResultExt};
