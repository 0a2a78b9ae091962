//! End-to-end bootstrap of a development server.
//!
//! # Sequence
//!
//! ```text
//! resolve bundler + loader from project
//!   → load base config (reporter = multiplexer)
//!   → multi-platform adjustment
//!   → config telemetry (spawned, never awaited)
//!   → dev-tools middleware + socket endpoints
//!   → install composed enhancer
//!   → attach telemetry middleware
//!   → launch (watch per CI flag)
//!   → normalize attachment, bind events sink
//!   → ServerHandle
//! ```
//!
//! Collaborator failures propagate unchanged through `?`. The telemetry
//! emitter is the only step whose failure is swallowed.

use crate::attachment::normalize;
use crate::collaborators::{
    DevToolsFactory, DevToolsOptions, PlatformAdjuster, ProjectMetadata, ProjectResolver,
    RunServerOptions,
};
use crate::config::{DevServerConfig, LoadOptions, StartOptions};
use crate::env::DevEnvironment;
use crate::error::Result;
use crate::middleware::compose_enhancer;
use crate::project::{PlatformBundlers, ProjectDescriptor};
use crate::reporter::{Reporter, ReporterMultiplexer};
use crate::server::ServerHandle;
use crate::telemetry::{config_event, Telemetry};
use crate::watch::{is_watch_enabled, Notify, TracingNotify};
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{debug, info};

/// External collaborators used during bootstrap.
#[derive(Clone)]
pub struct Collaborators {
    pub resolver: Arc<dyn ProjectResolver>,
    pub project: Arc<dyn ProjectMetadata>,
    pub adjuster: Arc<dyn PlatformAdjuster>,
    pub dev_tools: Arc<dyn DevToolsFactory>,
    pub telemetry: Arc<dyn Telemetry>,
}

/// Drives the bootstrap sequence.
pub struct ServerLauncher {
    collaborators: Collaborators,
    terminal: Arc<dyn Reporter>,
    notify: Arc<dyn Notify>,
    env: DevEnvironment,
}

impl ServerLauncher {
    /// Create a launcher rendering events to `terminal`.
    ///
    /// Environment flags are read from the process; notices go to `tracing`.
    ///
    /// # Arguments
    ///
    /// * `collaborators` - Resolver, metadata, adjuster, dev-tools factory and telemetry
    /// * `terminal` - Renderer that receives every reporter event first
    pub fn new(collaborators: Collaborators, terminal: Arc<dyn Reporter>) -> Self {
        Self {
            collaborators,
            terminal,
            notify: Arc::new(TracingNotify),
            env: DevEnvironment::from_process(),
        }
    }

    /// Replace the notifier that receives the CI watch warning.
    ///
    /// # Arguments
    ///
    /// * `notify` - Destination for user-facing notices
    pub fn with_notify(mut self, notify: Arc<dyn Notify>) -> Self {
        self.notify = notify;
        self
    }

    /// Use `env` instead of the flags read from the process.
    ///
    /// # Arguments
    ///
    /// * `env` - CI and telemetry opt-out switches
    pub fn with_environment(mut self, env: DevEnvironment) -> Self {
        self.env = env;
        self
    }

    /// Stand up the dev server for `project_root`.
    ///
    /// Resolves once the server accepts connections. Configuration telemetry
    /// is spawned on the current tokio runtime; it is skipped when none is
    /// running.
    ///
    /// # Arguments
    ///
    /// * `project_root` - Directory holding the project to serve
    /// * `options` - Caller overrides applied on top of the loaded config
    ///
    /// # Returns
    ///
    /// The running server, its middleware stack and the message socket.
    ///
    /// # Errors
    ///
    /// Returns the first collaborator failure unchanged, or
    /// [`Error::UnsupportedAttachment`](crate::Error::UnsupportedAttachment) /
    /// [`Error::SinkAlreadyBound`](crate::Error::SinkAlreadyBound) when the
    /// launched server cannot be normalized.
    pub async fn bootstrap(
        &self,
        project_root: &Path,
        options: StartOptions,
    ) -> Result<ServerHandle> {
        let resolver = &self.collaborators.resolver;
        let bundler = resolver.resolve_bundler(project_root)?;
        let config_loader = resolver.resolve_config_loader(project_root)?;

        let reporter = Arc::new(ReporterMultiplexer::new(self.terminal.clone()));
        let load_options = LoadOptions {
            reporter: reporter.clone(),
            options,
        };
        let config = config_loader.load(project_root, load_options).await?;
        debug!(port = config.server.port, "Loaded base config");

        let project = self.collaborators.project.describe(project_root)?;
        let platform_bundlers = PlatformBundlers::from_project(&project);
        let mut config = self
            .collaborators
            .adjuster
            .adjust(project_root, config, &platform_bundlers)
            .await?;
        debug!(platforms = ?config.resolver.platforms, "Applied platform settings");

        self.report_config(&project, &config);

        let dev_tools = self.collaborators.dev_tools.create(
            project_root,
            DevToolsOptions {
                port: config.server.port,
                watch_folders: config.watch_folders.clone(),
            },
            &project,
        )?;
        let middleware = dev_tools.middleware;

        let prior = config.server.enhance_middleware.take();
        config.server.enhance_middleware = Some(compose_enhancer(middleware.clone(), prior));

        middleware.use_layer(
            "telemetry",
            self.collaborators.telemetry.middleware(project_root, &project),
        );

        let watch = is_watch_enabled(&self.env, self.notify.as_ref());
        let server = bundler
            .run_server(
                config,
                RunServerOptions {
                    hmr_enabled: true,
                    websocket_endpoints: dev_tools.websocket_endpoints,
                    watch,
                },
            )
            .await?;
        info!(address = %server.local_addr(), watch, "Bundler server started");

        let sockets = normalize(dev_tools.attachment, &server)?;
        reporter.bind_sink(sockets.report_event)?;

        Ok(ServerHandle {
            server,
            middleware,
            message_socket: sockets.message_socket,
        })
    }

    /// Fire-and-forget configuration telemetry.
    fn report_config(&self, project: &ProjectDescriptor, config: &DevServerConfig) {
        let event = config_event(project, config);
        let telemetry = self.collaborators.telemetry.clone();
        spawn_detached(async move {
            if let Err(e) = telemetry.log_event(event).await {
                debug!(error = %e, "Dropped config telemetry");
            }
        });
    }
}

/// Spawn `task` on the current runtime without awaiting it.
///
/// Returns `false` and drops the task when called outside a tokio runtime.
fn spawn_detached<F>(task: F) -> bool
where
    F: Future<Output = ()> + Send + 'static,
{
    match Handle::try_current() {
        Ok(handle) => {
            handle.spawn(task);
            true
        }
        Err(_) => {
            debug!("No tokio runtime; skipping config telemetry");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::oneshot;

    #[test]
    fn test_spawn_outside_runtime_is_skipped() {
        assert!(!spawn_detached(async {}));
    }

    #[tokio::test]
    async fn test_spawn_inside_runtime_runs_task() {
        let (tx, rx) = oneshot::channel();
        assert!(spawn_detached(async move {
            let _ = tx.send(7);
        }));
        assert_eq!(rx.await.unwrap(), 7);
    }
}
