//! Project descriptor and the platform → bundler map derived from it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Target platforms a project can be served for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Ios,
    Android,
    Web,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Ios => "ios",
            Platform::Android => "android",
            Platform::Web => "web",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bundler responsible for a platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BundlerKind {
    /// The dev server's own bundler
    Metro,
    /// Served by a separate webpack process
    Webpack,
}

/// Structured description of the project being served.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDescriptor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdk_version: Option<String>,
    #[serde(default)]
    pub platforms: Vec<Platform>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_bundler: Option<BundlerKind>,
}

impl ProjectDescriptor {
    /// Major component of the declared SDK version, if parseable.
    pub fn sdk_major(&self) -> Option<u32> {
        self.sdk_version
            .as_deref()?
            .split('.')
            .next()?
            .trim()
            .parse()
            .ok()
    }
}

/// Which bundler serves each platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformBundlers {
    pub ios: BundlerKind,
    pub android: BundlerKind,
    pub web: BundlerKind,
}

impl PlatformBundlers {
    /// Native platforms always use metro; web uses webpack unless the
    /// project opts in to another bundler.
    pub fn from_project(project: &ProjectDescriptor) -> Self {
        Self {
            ios: BundlerKind::Metro,
            android: BundlerKind::Metro,
            web: project.web_bundler.unwrap_or(BundlerKind::Webpack),
        }
    }

    pub fn get(&self, platform: Platform) -> BundlerKind {
        match platform {
            Platform::Ios => self.ios,
            Platform::Android => self.android,
            Platform::Web => self.web,
        }
    }

    /// Platforms served by `kind`, in declaration order.
    pub fn platforms_for(&self, kind: BundlerKind) -> Vec<Platform> {
        [Platform::Ios, Platform::Android, Platform::Web]
            .into_iter()
            .filter(|platform| self.get(*platform) == kind)
            .collect()
    }
}
