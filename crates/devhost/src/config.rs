//! Dev server configuration produced by the project's config loader.

use crate::middleware::EnhanceMiddleware;
use crate::project::Platform;
use crate::reporter::Reporter;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::sync::Arc;

pub const DEFAULT_PORT: u16 = 8081;

/// Mutable bundler configuration for one bootstrap.
///
/// Created by the config loader and owned by the launcher until it is
/// handed to the bundler's launch call.
pub struct DevServerConfig {
    pub project_root: PathBuf,
    pub server: ServerConfig,
    pub watch_folders: Vec<PathBuf>,
    pub resolver: ResolverConfig,
    pub max_workers: Option<usize>,
    pub reset_cache: bool,
    /// Reporter every bundler event goes through
    pub reporter: Arc<dyn Reporter>,
}

impl DevServerConfig {
    /// Serializable view used for display and telemetry.
    pub fn summary(&self) -> ConfigSummary {
        ConfigSummary {
            project_root: self.project_root.clone(),
            host: self.server.host,
            port: self.server.port,
            watch_folders: self.watch_folders.clone(),
            platforms: self.resolver.platforms.clone(),
            source_exts: self.resolver.source_exts.clone(),
            max_workers: self.max_workers,
            reset_cache: self.reset_cache,
            enhance_middleware: self.server.enhance_middleware.is_some(),
        }
    }
}

impl fmt::Debug for DevServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DevServerConfig")
            .field("project_root", &self.project_root)
            .field("server", &self.server)
            .field("watch_folders", &self.watch_folders)
            .field("resolver", &self.resolver)
            .field("max_workers", &self.max_workers)
            .field("reset_cache", &self.reset_cache)
            .finish_non_exhaustive()
    }
}

/// Network settings plus the middleware enhancement slot.
#[derive(Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub enhance_middleware: Option<EnhanceMiddleware>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            enhance_middleware: None,
        }
    }
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("enhance_middleware", &self.enhance_middleware.is_some())
            .finish()
    }
}

/// Module resolution settings the platform pass may rewrite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolverConfig {
    pub platforms: Vec<Platform>,
    pub source_exts: Vec<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            platforms: vec![Platform::Ios, Platform::Android],
            source_exts: ["js", "jsx", "ts", "tsx", "json"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// Plain-data snapshot of a [`DevServerConfig`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSummary {
    pub project_root: PathBuf,
    pub host: IpAddr,
    pub port: u16,
    pub watch_folders: Vec<PathBuf>,
    pub platforms: Vec<Platform>,
    pub source_exts: Vec<String>,
    pub max_workers: Option<usize>,
    pub reset_cache: bool,
    pub enhance_middleware: bool,
}

/// Caller-supplied start options.
///
/// There is no reporter field; the launcher always owns that slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<IpAddr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_workers: Option<usize>,
    #[serde(default)]
    pub reset_cache: bool,
}

/// What the launcher hands to the config loader.
#[derive(Clone)]
pub struct LoadOptions {
    pub reporter: Arc<dyn Reporter>,
    pub options: StartOptions,
}

impl fmt::Debug for LoadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadOptions")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
