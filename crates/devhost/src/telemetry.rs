//! Telemetry contract and the configuration event.
//!
//! Telemetry is best-effort everywhere: the launcher spawns event delivery
//! and never waits for it, and a failing emitter cannot affect bootstrap.

use crate::config::DevServerConfig;
use crate::error::Result;
use crate::middleware::{Middleware, StackLayer};
use crate::project::ProjectDescriptor;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::path::Path;
use std::sync::Arc;

/// Name of the event describing the resolved configuration.
pub const CONFIG_EVENT: &str = "dev server config";

/// A named telemetry record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryEvent {
    pub name: String,
    pub properties: Map<String, Value>,
}

impl TelemetryEvent {
    pub fn new(name: impl Into<String>, properties: Map<String, Value>) -> Self {
        Self {
            name: name.into(),
            properties,
        }
    }
}

/// Telemetry collaborator: request-capturing middleware plus an emitter.
#[async_trait]
pub trait Telemetry: Send + Sync {
    /// Layer installed on the dev-tooling stack.
    fn middleware(&self, project_root: &Path, project: &ProjectDescriptor) -> StackLayer;

    /// Deliver one event.
    async fn log_event(&self, event: TelemetryEvent) -> Result<()>;
}

/// Telemetry that records nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledTelemetry;

#[async_trait]
impl Telemetry for DisabledTelemetry {
    fn middleware(&self, _project_root: &Path, _project: &ProjectDescriptor) -> StackLayer {
        Arc::new(|middleware: Middleware| middleware)
    }

    async fn log_event(&self, _event: TelemetryEvent) -> Result<()> {
        Ok(())
    }
}

/// Describe the resolved configuration.
pub fn config_event(project: &ProjectDescriptor, config: &DevServerConfig) -> TelemetryEvent {
    let mut properties = Map::new();
    properties.insert("sdkVersion".into(), json!(project.sdk_version));
    properties.insert("platforms".into(), json!(config.resolver.platforms));
    properties.insert("sourceExts".into(), json!(config.resolver.source_exts));
    properties.insert("watchFolderCount".into(), json!(config.watch_folders.len()));
    properties.insert("maxWorkers".into(), json!(config.max_workers));
    properties.insert("resetCache".into(), json!(config.reset_cache));
    properties.insert(
        "customEnhancer".into(),
        json!(config.server.enhance_middleware.is_some()),
    );
    TelemetryEvent::new(CONFIG_EVENT, properties)
}
