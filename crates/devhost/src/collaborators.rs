//! Interfaces of the external collaborators the launcher drives.
//!
//! Each trait is one boundary from the launch sequence. Implementations are
//! resolved per project, so a single orchestrator can serve projects pinned
//! to incompatible bundler releases.

use crate::attachment::AttachmentResult;
use crate::config::{DevServerConfig, LoadOptions};
use crate::error::Result;
use crate::middleware::MiddlewareStack;
use crate::project::{PlatformBundlers, ProjectDescriptor};
use crate::server::RunningServer;
use crate::socket::WebsocketEndpoints;
use async_trait::async_trait;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Loads the base bundler configuration for a project.
#[async_trait]
pub trait ConfigLoader: Send + Sync {
    async fn load(&self, project_root: &Path, options: LoadOptions) -> Result<DevServerConfig>;
}

/// Options for the bundler's launch call.
#[derive(Debug, Clone)]
pub struct RunServerOptions {
    pub hmr_enabled: bool,
    pub websocket_endpoints: WebsocketEndpoints,
    pub watch: bool,
}

/// The bundler's server entry point.
#[async_trait]
pub trait Bundler: Send + Sync {
    /// Start serving. Resolves once the server accepts connections.
    async fn run_server(
        &self,
        config: DevServerConfig,
        options: RunServerOptions,
    ) -> Result<RunningServer>;
}

/// Obtains the bundler and its config loader from the project's own
/// dependency tree rather than the orchestrator's.
pub trait ProjectResolver: Send + Sync {
    fn resolve_bundler(&self, project_root: &Path) -> Result<Arc<dyn Bundler>>;

    fn resolve_config_loader(&self, project_root: &Path) -> Result<Arc<dyn ConfigLoader>>;
}

/// Reads the project descriptor.
pub trait ProjectMetadata: Send + Sync {
    fn describe(&self, project_root: &Path) -> Result<ProjectDescriptor>;
}

/// Multi-platform adjustment pass, run between base load and launch.
#[async_trait]
pub trait PlatformAdjuster: Send + Sync {
    async fn adjust(
        &self,
        project_root: &Path,
        config: DevServerConfig,
        bundlers: &PlatformBundlers,
    ) -> Result<DevServerConfig>;
}

/// Inputs for building the dev-tooling middleware.
#[derive(Debug, Clone)]
pub struct DevToolsOptions {
    pub port: u16,
    pub watch_folders: Vec<PathBuf>,
}

/// Dev-tooling middleware, socket endpoints and attachment fields.
pub struct DevTools {
    pub middleware: Arc<MiddlewareStack>,
    pub websocket_endpoints: WebsocketEndpoints,
    pub attachment: AttachmentResult,
}

impl fmt::Debug for DevTools {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DevTools")
            .field("middleware", &self.middleware)
            .field("websocket_endpoints", &self.websocket_endpoints)
            .field("attachment", &self.attachment)
            .finish()
    }
}

/// Builds dev-tooling middleware and socket endpoints.
pub trait DevToolsFactory: Send + Sync {
    fn create(
        &self,
        project_root: &Path,
        options: DevToolsOptions,
        project: &ProjectDescriptor,
    ) -> Result<DevTools>;
}
