//! Error types for dev server orchestration.
//!
//! Every bootstrap step that talks to an external collaborator reports
//! failures through [`Error`]. The launcher forwards those errors with `?`
//! and never rewraps them, so callers see exactly what the collaborator
//! produced.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while bootstrapping a development server.
#[derive(Debug, Error)]
pub enum Error {
    /// The bundler or its config loader could not be obtained from the
    /// project's own dependency tree.
    #[error("Failed to resolve bundler from {}: {message}", .project_root.display())]
    ProjectResolution {
        /// Project that was being resolved
        project_root: PathBuf,
        /// What went wrong
        message: String,
    },

    /// Base configuration could not be loaded
    #[error("Failed to load bundler config: {0}")]
    ConfigLoad(String),

    /// The multi-platform adjustment pass rejected the configuration
    #[error("Failed to apply platform settings: {0}")]
    PlatformAdjust(String),

    /// Dev-tooling middleware or socket endpoints could not be constructed
    #[error("Failed to create dev-tools middleware: {0}")]
    DevTools(String),

    /// The bundler's server failed to start
    #[error("Failed to start bundler server: {0}")]
    Launch(String),

    /// The launch result exposed neither attachment protocol.
    ///
    /// Signals an unsupported bundler version. Never downgraded to an empty
    /// message socket.
    #[error("Unsupported bundler attachment protocol: {0}\n\nHint: The installed bundler version does not expose live-reload sockets")]
    UnsupportedAttachment(&'static str),

    /// A reporter sink was bound twice
    #[error("Reporter sink is already bound")]
    SinkAlreadyBound,

    /// Telemetry delivery failed
    #[error("Telemetry error: {0}")]
    Telemetry(String),

    /// I/O errors from collaborators
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias using [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;
