//! File-backed telemetry.
//!
//! Events are appended as JSON lines to `<project>/.devhost/telemetry.jsonl`.

use async_trait::async_trait;
use axum::extract::Request;
use axum::middleware::{self, Next};
use devhost::{Middleware, ProjectDescriptor, StackLayer, Telemetry, TelemetryEvent};
use serde_json::{Map, json};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::io::AsyncWriteExt;
use tracing::debug;

pub const TELEMETRY_DIR: &str = ".devhost";
pub const TELEMETRY_FILE: &str = "telemetry.jsonl";
pub const DEBUGGER_EVENT: &str = "debugger request";

const DEBUGGER_PREFIXES: [&str; 2] = ["/json", "/inspector"];

/// Appends events to a JSON-lines file.
#[derive(Debug, Clone)]
pub struct FileTelemetry {
    path: PathBuf,
}

impl FileTelemetry {
    /// Telemetry stored inside `project_root`.
    pub fn for_project(project_root: &Path) -> Self {
        Self {
            path: project_root.join(TELEMETRY_DIR).join(TELEMETRY_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn record(event: &TelemetryEvent) -> String {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        json!({
            "event": event.name,
            "properties": event.properties,
            "timestamp": timestamp,
        })
        .to_string()
    }
}

pub fn is_debugger_request(path: &str) -> bool {
    DEBUGGER_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}

#[async_trait]
impl Telemetry for FileTelemetry {
    fn middleware(&self, _project_root: &Path, project: &ProjectDescriptor) -> StackLayer {
        let telemetry = Arc::new(self.clone());
        let sdk_version = project.sdk_version.clone();

        Arc::new(move |router: Middleware| {
            let telemetry = telemetry.clone();
            let sdk_version = sdk_version.clone();
            router.layer(middleware::from_fn(move |req: Request, next: Next| {
                let path = req.uri().path().to_string();
                if is_debugger_request(&path) {
                    let mut properties = Map::new();
                    properties.insert("path".into(), json!(path));
                    properties.insert("method".into(), json!(req.method().as_str()));
                    properties.insert("sdkVersion".into(), json!(sdk_version));
                    let event = TelemetryEvent::new(DEBUGGER_EVENT, properties);

                    let telemetry = telemetry.clone();
                    tokio::spawn(async move {
                        if let Err(e) = telemetry.log_event(event).await {
                            debug!(error = %e, "Dropped debugger telemetry");
                        }
                    });
                }
                next.run(req)
            }))
        })
    }

    async fn log_event(&self, event: TelemetryEvent) -> devhost::Result<()> {
        if let Some(dir) = self.path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }
        let mut line = Self::record(&event);
        line.push('\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::body::Body;
    use axum::http::StatusCode;
    use serde_json::Value;
    use std::time::Duration;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn read_lines(path: &Path) -> Vec<Value> {
        std::fs::read_to_string(path)
            .unwrap_or_default()
            .lines()
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect()
    }

    #[test]
    fn test_debugger_prefixes() {
        assert!(is_debugger_request("/json/list"));
        assert!(is_debugger_request("/inspector/device"));
        assert!(!is_debugger_request("/index.bundle"));
        assert!(!is_debugger_request("/status"));
    }

    #[tokio::test]
    async fn test_events_are_appended() {
        let dir = TempDir::new().unwrap();
        let telemetry = FileTelemetry::for_project(dir.path());

        telemetry
            .log_event(TelemetryEvent::new("first", Map::new()))
            .await
            .unwrap();
        telemetry
            .log_event(TelemetryEvent::new("second", Map::new()))
            .await
            .unwrap();

        let lines = read_lines(telemetry.path());
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["event"], "first");
        assert_eq!(lines[1]["event"], "second");
        assert!(lines[1]["timestamp"].as_u64().is_some());
    }

    #[tokio::test]
    async fn test_middleware_records_debugger_requests_only() {
        let dir = TempDir::new().unwrap();
        let telemetry = FileTelemetry::for_project(dir.path());
        let project = ProjectDescriptor {
            sdk_version: Some("50.0.0".to_string()),
            ..Default::default()
        };

        let layer = telemetry.middleware(dir.path(), &project);
        let app = layer(Router::new().fallback(|| async { StatusCode::OK }));

        for uri in ["/json/version", "/index.bundle"] {
            let response = app
                .clone()
                .oneshot(axum::http::Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let mut lines = Vec::new();
        for _ in 0..50 {
            lines = read_lines(telemetry.path());
            if !lines.is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["event"], DEBUGGER_EVENT);
        assert_eq!(lines[0]["properties"]["path"], "/json/version");
        assert_eq!(lines[0]["properties"]["sdkVersion"], "50.0.0");
    }
}
