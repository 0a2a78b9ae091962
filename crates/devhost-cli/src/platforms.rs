//! Multi-platform adjustment of the resolver settings.

use async_trait::async_trait;
use devhost::{BundlerKind, DevServerConfig, Platform, PlatformAdjuster, PlatformBundlers};
use std::path::Path;
use tracing::debug;

/// Serves `web` through the dev server only when the project routes web
/// through metro.
///
/// Fails with [`devhost::Error::PlatformAdjust`] when the adjustment leaves
/// no platform to serve.
#[derive(Debug, Default, Clone, Copy)]
pub struct MultiPlatformAdjuster;

#[async_trait]
impl PlatformAdjuster for MultiPlatformAdjuster {
    async fn adjust(
        &self,
        _project_root: &Path,
        mut config: DevServerConfig,
        bundlers: &PlatformBundlers,
    ) -> devhost::Result<DevServerConfig> {
        let platforms = &mut config.resolver.platforms;
        if bundlers.web == BundlerKind::Metro {
            if !platforms.contains(&Platform::Web) {
                platforms.push(Platform::Web);
            }
        } else {
            platforms.retain(|platform| *platform != Platform::Web);
        }
        debug!(platforms = ?platforms, web = ?bundlers.web, "Adjusted resolver platforms");
        if platforms.is_empty() {
            return Err(devhost::Error::PlatformAdjust(
                "no platform left for the dev server to serve".to_string(),
            ));
        }
        Ok(config)
    }
}
