//! Project descriptor read from `app.json`.

use devhost::{BundlerKind, Platform, ProjectDescriptor, ProjectMetadata};
use serde::Deserialize;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

pub const APP_JSON: &str = "app.json";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppManifest {
    name: Option<String>,
    sdk_version: Option<String>,
    #[serde(default)]
    platforms: Vec<Platform>,
    web: Option<WebSection>,
}

#[derive(Debug, Default, Deserialize)]
struct WebSection {
    bundler: Option<BundlerKind>,
}

/// Reads `app.json`, either top-level or nested under an `expo` key.
#[derive(Debug, Default, Clone, Copy)]
pub struct AppJsonProject;

impl AppJsonProject {
    fn parse(project_root: &Path, contents: &str) -> devhost::Result<ProjectDescriptor> {
        let mut value: Value = serde_json::from_str(contents)?;
        if let Some(nested) = value.get_mut("expo").map(Value::take) {
            value = nested;
        }
        let manifest: AppManifest = serde_json::from_value(value)?;

        Ok(ProjectDescriptor {
            name: manifest.name.unwrap_or_else(|| directory_name(project_root)),
            sdk_version: manifest.sdk_version,
            platforms: manifest.platforms,
            web_bundler: manifest.web.and_then(|web| web.bundler),
        })
    }
}

impl ProjectMetadata for AppJsonProject {
    fn describe(&self, project_root: &Path) -> devhost::Result<ProjectDescriptor> {
        let path = project_root.join(APP_JSON);
        match std::fs::read_to_string(&path) {
            Ok(contents) => Self::parse(project_root, &contents),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "No app.json, using directory name");
                Ok(ProjectDescriptor {
                    name: directory_name(project_root),
                    ..Default::default()
                })
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn directory_name(project_root: &Path) -> String {
    project_root
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "app".to_string())
}
