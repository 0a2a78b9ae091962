//! Resolves the bundler and config loader belonging to a project.

use crate::bundler::LocalBundler;
use crate::config::FileConfigLoader;
use devhost::{Bundler, ConfigLoader, ProjectResolver};
use std::path::Path;
use std::sync::Arc;

pub const PACKAGE_JSON: &str = "package.json";

/// Hands out project-scoped modules once the project has a `package.json`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProjectModules;

impl ProjectModules {
    fn require_package(project_root: &Path) -> devhost::Result<()> {
        if project_root.join(PACKAGE_JSON).is_file() {
            Ok(())
        } else {
            Err(devhost::Error::ProjectResolution {
                project_root: project_root.to_path_buf(),
                message: format!("{} not found", PACKAGE_JSON),
            })
        }
    }
}

impl ProjectResolver for ProjectModules {
    fn resolve_bundler(&self, project_root: &Path) -> devhost::Result<Arc<dyn Bundler>> {
        Self::require_package(project_root)?;
        Ok(Arc::new(LocalBundler))
    }

    fn resolve_config_loader(&self, project_root: &Path) -> devhost::Result<Arc<dyn ConfigLoader>> {
        Self::require_package(project_root)?;
        Ok(Arc::new(FileConfigLoader))
    }
}
