//! Devhost - bootstrap-and-broadcast orchestration for bundler dev servers.
//!
//! Stands up a bundler's development server, reconciles the two socket
//! attachment protocols bundler releases have shipped, and fans a single
//! stream of bundler events out to the terminal and to live-reload clients.
//!
//! # Architecture
//!
//! - [`launcher`] - the bootstrap sequence ([`ServerLauncher::bootstrap`])
//! - [`attachment`] - legacy vs current socket attachment ([`normalize`])
//! - [`reporter`] - event fan-out with a write-once sink
//! - [`middleware`] - dev-tooling stack and enhancer composition
//! - [`watch`] - watch-mode decision and CI warning
//! - [`collaborators`] - traits for everything the launcher drives
//!
//! # Example
//!
//! ```rust,no_run
//! use devhost::{Collaborators, Reporter, ReporterEvent, ServerLauncher, StartOptions};
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! struct Stdout;
//!
//! impl Reporter for Stdout {
//!     fn update(&self, event: &ReporterEvent) {
//!         println!("{:?}", event.kind());
//!     }
//! }
//!
//! # async fn run(collaborators: Collaborators) -> devhost::Result<()> {
//! let launcher = ServerLauncher::new(collaborators, Arc::new(Stdout));
//! let handle = launcher
//!     .bootstrap(Path::new("./my-app"), StartOptions::default())
//!     .await?;
//! handle.message_socket.broadcast("reload", None);
//! # Ok(())
//! # }
//! ```

pub mod attachment;
pub mod collaborators;
pub mod config;
pub mod env;
pub mod error;
pub mod event;
pub mod launcher;
pub mod middleware;
pub mod project;
pub mod reporter;
pub mod server;
pub mod socket;
pub mod telemetry;
pub mod watch;

pub use attachment::{
    normalize, AttachToServer, AttachedSockets, Attachment, AttachmentResult, NormalizedSockets,
    Protocol,
};
pub use collaborators::{
    Bundler, ConfigLoader, DevTools, DevToolsFactory, DevToolsOptions, PlatformAdjuster,
    ProjectMetadata, ProjectResolver, RunServerOptions,
};
pub use config::{DevServerConfig, LoadOptions, ResolverConfig, ServerConfig, StartOptions};
pub use env::DevEnvironment;
pub use error::{Error, Result};
pub use event::ReporterEvent;
pub use launcher::{Collaborators, ServerLauncher};
pub use middleware::{compose_enhancer, EnhanceMiddleware, Middleware, MiddlewareStack, StackLayer};
pub use project::{BundlerKind, Platform, PlatformBundlers, ProjectDescriptor};
pub use reporter::{EventSink, Reporter, ReporterMultiplexer};
pub use server::{RunningServer, ServerContext, ServerHandle};
pub use socket::{BroadcastParams, MessageSocket, WebsocketEndpoints};
pub use telemetry::{DisabledTelemetry, Telemetry, TelemetryEvent};
pub use watch::{is_watch_enabled, Notify, TracingNotify, WatchDecision};
