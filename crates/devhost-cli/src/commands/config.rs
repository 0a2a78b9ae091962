//! `devhost config`: print the resolved configuration.

use crate::cli::ConfigArgs;
use crate::commands::canonical_root;
use crate::config::FileConfig;
use crate::error::Result;
use crate::platforms::MultiPlatformAdjuster;
use crate::project::AppJsonProject;
use crate::reporter::TerminalReporter;
use devhost::config::ConfigSummary;
use devhost::{PlatformAdjuster, PlatformBundlers, ProjectMetadata, StartOptions};
use std::path::Path;
use std::sync::Arc;

/// Load, validate and platform-adjust the configuration for `project_root`.
pub async fn resolve(project_root: &Path) -> Result<ConfigSummary> {
    let file = FileConfig::load(project_root, &StartOptions::default())?;
    let config = file.into_dev_server_config(project_root, Arc::new(TerminalReporter::new()));

    let project = AppJsonProject.describe(project_root)?;
    let bundlers = PlatformBundlers::from_project(&project);
    let config = MultiPlatformAdjuster
        .adjust(project_root, config, &bundlers)
        .await?;

    Ok(config.summary())
}

/// Execute the config command.
pub async fn execute(args: ConfigArgs) -> Result<()> {
    let project_root = canonical_root(&args.project_root)?;
    let summary = resolve(&project_root).await?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    #[serial]
    async fn test_resolve_applies_platforms() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("app.json"),
            r#"{ "expo": { "web": { "bundler": "metro" } } }"#,
        )
        .unwrap();
        fs::write(dir.path().join("devhost.config.json"), r#"{ "port": 19000 }"#).unwrap();

        let summary = resolve(dir.path()).await.unwrap();
        assert_eq!(summary.port, 19000);
        assert_eq!(
            summary.platforms,
            vec![
                devhost::Platform::Ios,
                devhost::Platform::Android,
                devhost::Platform::Web
            ]
        );
        assert!(!summary.enhance_middleware);
    }

    #[tokio::test]
    #[serial]
    async fn test_resolve_reports_config_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("devhost.config.json"), "[1, 2]").unwrap();

        let err = resolve(dir.path()).await.unwrap_err();
        assert!(matches!(err, crate::error::CliError::Config(_)));
    }
}
