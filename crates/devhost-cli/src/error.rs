//! Error handling for the Devhost CLI.
//!
//! Errors are layered the same way the commands are:
//! - **Top-level errors** (`CliError`) are what commands return
//! - **Config errors** (`ConfigError`) carry a hint the user can act on
//! - **Core errors** (`devhost::Error`) pass through unchanged via `#[from]`
//!
//! `main` turns the final error into a `miette::Report` with
//! [`cli_error_to_miette`].
//!
//! # Example
//!
//! ```rust,no_run
//! use devhost_cli::error::{Result, ResultExt};
//! use std::path::Path;
//!
//! fn read_manifest(root: &Path) -> Result<String> {
//!     let path = root.join("package.json");
//!     std::fs::read_to_string(&path).with_path(&path)
//! }
//! ```

mod report;

pub use report::cli_error_to_miette;

use std::path::PathBuf;
use thiserror::Error;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Errors raised while bootstrapping or driving the dev server
    #[error(transparent)]
    Devhost(#[from] devhost::Error),

    /// Configuration file or override problems
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// File or directory not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors from loading `devhost.config.json` and its overrides.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Figment could not merge or extract the layered configuration
    #[error("{message}\n\nHint: Check devhost.config.json syntax and field types")]
    Extract {
        /// Extraction failure as reported by figment
        message: String,
    },

    /// A field parsed but holds an unusable value
    #[error("Invalid value for '{field}': {value}\n\nHint: {hint}")]
    InvalidValue {
        field: String,
        value: String,
        hint: String,
    },

    /// A configured path could not be resolved on disk
    #[error("Failed to resolve {}: {source}", .path.display())]
    Path {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError::Extract {
            message: err.to_string(),
        }
    }
}

/// Result type alias using `CliError` as the default error type.
pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Extension trait for adding context to `Result` types.
pub trait ResultExt<T> {
    /// Turn a not-found I/O error into [`CliError::FileNotFound`] for `path`.
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T>;
}

impl<T, E: Into<CliError>> ResultExt<T> for std::result::Result<T, E> {
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T> {
        self.map_err(|e| match e.into() {
            CliError::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound => {
                CliError::FileNotFound(path.as_ref().to_path_buf())
            }
            other => other,
        })
    }
}
