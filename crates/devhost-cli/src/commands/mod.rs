//! Command implementations for the Devhost CLI.
//!
//! - [`start`] - Bootstrap and serve until Ctrl+C
//! - [`config`] - Print the resolved configuration

pub mod config;
pub mod start;

pub use config::execute as config_execute;
pub use start::execute as start_execute;

use crate::error::{Result, ResultExt};
use std::path::{Path, PathBuf};

/// Absolute, symlink-free project root.
pub(crate) fn canonical_root(project_root: &Path) -> Result<PathBuf> {
    std::fs::canonicalize(project_root).with_path(project_root)
}
