//! `devhost.config.json` loading.
//!
//! Priority: start options > `DEVHOST_*` environment > config file > defaults.

use crate::error::ConfigError;
use async_trait::async_trait;
use devhost::{
    ConfigLoader, DevServerConfig, LoadOptions, Platform, Reporter, ResolverConfig, ServerConfig,
    StartOptions, config::DEFAULT_PORT,
};
use figment::{
    Figment,
    providers::{Env, Format as _, Json, Serialized},
};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

pub const CONFIG_FILE: &str = "devhost.config.json";
pub const ENV_PREFIX: &str = "DEVHOST_";

const ENV_KEYS: [&str; 4] = ["host", "port", "max_workers", "reset_cache"];

/// Settings a project can put in `devhost.config.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileConfig {
    pub host: IpAddr,
    pub port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_workers: Option<usize>,
    #[serde(default)]
    pub reset_cache: bool,
    /// Extra folders to watch, relative to the project root
    #[serde(default)]
    pub watch_folders: Vec<PathBuf>,
    pub platforms: Vec<Platform>,
    pub source_exts: Vec<String>,
}

impl Default for FileConfig {
    fn default() -> Self {
        let resolver = ResolverConfig::default();
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            max_workers: None,
            reset_cache: false,
            watch_folders: Vec::new(),
            platforms: resolver.platforms,
            source_exts: resolver.source_exts,
        }
    }
}

/// Sparse layer from the environment or the caller.
///
/// Reads snake_case (figment lowercases env keys), writes camelCase so it
/// lines up with [`FileConfig`].
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
struct Overrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    host: Option<IpAddr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_workers: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reset_cache: Option<bool>,
}

impl From<&StartOptions> for Overrides {
    fn from(options: &StartOptions) -> Self {
        Self {
            host: options.host,
            port: options.port,
            max_workers: options.max_workers,
            // An unset flag must not clear a `resetCache: true` from the file.
            reset_cache: options.reset_cache.then_some(true),
        }
    }
}

impl FileConfig {
    /// Load and validate the layered configuration for `project_root`.
    ///
    /// # Arguments
    ///
    /// * `project_root` - Directory holding `devhost.config.json`
    /// * `options` - Caller overrides applied after the file and environment
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a layer fails to parse, a value is out of
    /// range, or a watch folder does not resolve to a directory.
    pub fn load(project_root: &Path, options: &StartOptions) -> Result<Self, ConfigError> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        let path = project_root.join(CONFIG_FILE);
        if path.is_file() {
            debug!(path = %path.display(), "Reading config file");
            figment = figment.merge(Json::file(path));
        }

        let env: Overrides = Figment::from(Env::prefixed(ENV_PREFIX).only(&ENV_KEYS)).extract()?;
        figment = figment
            .merge(Serialized::defaults(env))
            .merge(Serialized::defaults(Overrides::from(options)));

        let mut config: Self = figment.extract()?;
        config.resolve_watch_folders(project_root)?;
        Ok(config)
    }

    /// Canonicalize watch folders, check they exist and put the project
    /// root first. Two spellings of one folder collapse into one entry.
    fn resolve_watch_folders(&mut self, project_root: &Path) -> Result<(), ConfigError> {
        let mut folders = vec![canonical(project_root)?];
        for folder in &self.watch_folders {
            let joined = if folder.is_absolute() {
                folder.clone()
            } else {
                project_root.join(folder)
            };
            if !joined.is_dir() {
                return Err(ConfigError::InvalidValue {
                    field: "watchFolders".to_string(),
                    value: joined.display().to_string(),
                    hint: "Watch folders must be existing directories, relative to the project root"
                        .to_string(),
                });
            }
            let resolved = canonical(&joined)?;
            if !folders.contains(&resolved) {
                folders.push(resolved);
            }
        }
        self.watch_folders = folders;
        Ok(())
    }

    pub fn into_dev_server_config(
        self,
        project_root: &Path,
        reporter: Arc<dyn Reporter>,
    ) -> DevServerConfig {
        DevServerConfig {
            project_root: project_root.to_path_buf(),
            server: ServerConfig {
                host: self.host,
                port: self.port,
                enhance_middleware: None,
            },
            watch_folders: self.watch_folders,
            resolver: ResolverConfig {
                platforms: self.platforms,
                source_exts: self.source_exts,
            },
            max_workers: self.max_workers,
            reset_cache: self.reset_cache,
            reporter,
        }
    }
}

fn canonical(path: &Path) -> Result<PathBuf, ConfigError> {
    path.canonicalize().map_err(|source| ConfigError::Path {
        path: path.to_path_buf(),
        source,
    })
}

/// Config loader backed by `devhost.config.json`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileConfigLoader;

#[async_trait]
impl ConfigLoader for FileConfigLoader {
    async fn load(
        &self,
        project_root: &Path,
        options: LoadOptions,
    ) -> devhost::Result<DevServerConfig> {
        let file = FileConfig::load(project_root, &options.options)
            .map_err(|e| devhost::Error::ConfigLoad(e.to_string()))?;
        debug!(host = %file.host, port = file.port, "Resolved config");
        Ok(file.into_dev_server_config(project_root, options.reporter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use devhost::ReporterEvent;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    struct Silent;

    impl Reporter for Silent {
        fn update(&self, _event: &ReporterEvent) {}
    }

    fn clear_env() {
        unsafe {
            for key in ["HOST", "PORT", "MAX_WORKERS", "RESET_CACHE"] {
                std::env::remove_var(format!("{ENV_PREFIX}{key}"));
            }
        }
    }

    fn project(config: Option<&str>) -> TempDir {
        let dir = TempDir::new().unwrap();
        if let Some(config) = config {
            fs::write(dir.path().join(CONFIG_FILE), config).unwrap();
        }
        dir
    }

    #[test]
    #[serial]
    fn test_defaults_without_config_file() {
        clear_env();
        let dir = project(None);

        let config = FileConfig::load(dir.path(), &StartOptions::default()).unwrap();
        assert_eq!(config.port, 8081);
        assert_eq!(config.host, IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(config.platforms, vec![Platform::Ios, Platform::Android]);
        assert_eq!(config.watch_folders, vec![dir.path().canonicalize().unwrap()]);
        assert!(config.source_exts.contains(&"tsx".to_string()));
    }

    #[test]
    #[serial]
    fn test_file_overrides_defaults() {
        clear_env();
        let dir = project(Some(
            r#"{ "port": 9000, "maxWorkers": 2, "resetCache": true, "platforms": ["android"] }"#,
        ));

        let config = FileConfig::load(dir.path(), &StartOptions::default()).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.max_workers, Some(2));
        assert!(config.reset_cache);
        assert_eq!(config.platforms, vec![Platform::Android]);
    }

    #[test]
    #[serial]
    fn test_env_overrides_file_and_options_override_env() {
        clear_env();
        let dir = project(Some(r#"{ "port": 9000 }"#));
        unsafe {
            std::env::set_var("DEVHOST_PORT", "9100");
            std::env::set_var("DEVHOST_MAX_WORKERS", "3");
        }

        let config = FileConfig::load(dir.path(), &StartOptions::default()).unwrap();
        assert_eq!(config.port, 9100);
        assert_eq!(config.max_workers, Some(3));

        let options = StartOptions {
            port: Some(9200),
            ..Default::default()
        };
        let config = FileConfig::load(dir.path(), &options).unwrap();
        assert_eq!(config.port, 9200);
        assert_eq!(config.max_workers, Some(3));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_unset_reset_flag_keeps_file_value() {
        clear_env();
        let dir = project(Some(r#"{ "resetCache": true }"#));

        let config = FileConfig::load(dir.path(), &StartOptions::default()).unwrap();
        assert!(config.reset_cache);
    }

    #[test]
    #[serial]
    fn test_watch_folders_resolved_with_root_first() {
        clear_env();
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("app");
        fs::create_dir_all(&root).unwrap();
        fs::create_dir_all(dir.path().join("shared")).unwrap();
        fs::write(
            root.join(CONFIG_FILE),
            r#"{ "watchFolders": ["../shared", "."] }"#,
        )
        .unwrap();

        let config = FileConfig::load(&root, &StartOptions::default()).unwrap();
        assert_eq!(
            config.watch_folders,
            vec![
                root.canonicalize().unwrap(),
                dir.path().join("shared").canonicalize().unwrap()
            ]
        );
    }

    #[test]
    #[serial]
    fn test_watch_folder_spellings_collapse() {
        clear_env();
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("app");
        let shared = dir.path().join("shared");
        fs::create_dir_all(&root).unwrap();
        fs::create_dir_all(&shared).unwrap();
        let absolute = shared.canonicalize().unwrap();
        fs::write(
            root.join(CONFIG_FILE),
            format!(
                r#"{{ "watchFolders": ["../shared", "../app/../shared", {:?}] }}"#,
                absolute.display().to_string()
            ),
        )
        .unwrap();

        let config = FileConfig::load(&root, &StartOptions::default()).unwrap();
        assert_eq!(config.watch_folders.len(), 2);
        assert_eq!(config.watch_folders[1], absolute);
        assert!(config.watch_folders.iter().all(|folder| !folder
            .components()
            .any(|c| c == std::path::Component::ParentDir)));
    }

    #[test]
    #[serial]
    fn test_missing_watch_folder_is_invalid() {
        clear_env();
        let dir = project(Some(r#"{ "watchFolders": ["does-not-exist"] }"#));

        let err = FileConfig::load(dir.path(), &StartOptions::default()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "watchFolders"));
    }

    #[test]
    #[serial]
    fn test_missing_project_root_is_path_error() {
        clear_env();
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("gone");

        let err = FileConfig::load(&root, &StartOptions::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Path { ref path, .. } if path == &root));
    }

    #[test]
    #[serial]
    fn test_malformed_file_is_extract_error() {
        clear_env();
        let dir = project(Some(r#"{ "port": "not a port" }"#));

        let err = FileConfig::load(dir.path(), &StartOptions::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Extract { .. }));
    }

    #[tokio::test]
    #[serial]
    async fn test_loader_builds_dev_server_config() {
        clear_env();
        let dir = project(Some(r#"{ "port": 0 }"#));
        let options = LoadOptions {
            reporter: Arc::new(Silent),
            options: StartOptions {
                max_workers: Some(1),
                ..Default::default()
            },
        };

        let config = FileConfigLoader.load(dir.path(), options).await.unwrap();
        assert_eq!(config.server.port, 0);
        assert_eq!(config.max_workers, Some(1));
        assert!(config.server.enhance_middleware.is_none());
        assert_eq!(config.project_root, dir.path());
    }

    #[tokio::test]
    #[serial]
    async fn test_loader_reports_config_load_error() {
        clear_env();
        let dir = project(Some("{ not json"));
        let options = LoadOptions {
            reporter: Arc::new(Silent),
            options: StartOptions::default(),
        };

        let err = FileConfigLoader.load(dir.path(), options).await.unwrap_err();
        assert!(matches!(err, devhost::Error::ConfigLoad(_)));
    }
}
