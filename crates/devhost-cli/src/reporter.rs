//! Terminal rendering of bundler events.

use crate::ui::{self, TransformProgress};
use devhost::{Reporter, ReporterEvent};
use parking_lot::Mutex;
use serde_json::Value;
use tracing::debug;

/// Renders known event kinds as status lines and a transform progress bar.
#[derive(Default)]
pub struct TerminalReporter {
    progress: Mutex<Option<TransformProgress>>,
}

/// How one event kind shows up in the terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    Success(String),
    Info(String),
    Error(String),
    Client { level: String, message: String },
    BuildStarted(String),
    Progress { done: u64, total: u64 },
    Ignored,
}

fn text(event: &ReporterEvent, field: &str) -> Option<String> {
    event.field(field).map(|value| match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

fn number(event: &ReporterEvent, field: &str) -> u64 {
    event.field(field).and_then(Value::as_u64).unwrap_or_default()
}

fn bundle_name(event: &ReporterEvent) -> String {
    event
        .field("bundleDetails")
        .and_then(|details| details.get("entryFile"))
        .and_then(Value::as_str)
        .map(String::from)
        .or_else(|| text(event, "bundle"))
        .unwrap_or_else(|| "bundle".to_string())
}

/// Decide how an event is presented, without touching the terminal.
pub fn render(event: &ReporterEvent) -> Rendered {
    match event.kind() {
        Some("initialize_started") => Rendered::Info(format!(
            "Starting dev server on port {}",
            number(event, "port")
        )),
        Some("initialize_done") => Rendered::Success(format!(
            "Dev server ready on port {}",
            number(event, "port")
        )),
        Some("initialize_failed") => Rendered::Error(format!(
            "Dev server failed to start: {}",
            text(event, "error").unwrap_or_else(|| "unknown error".to_string())
        )),
        Some("bundle_build_started") => Rendered::BuildStarted(bundle_name(event)),
        Some("bundle_transform_progressed") => Rendered::Progress {
            done: number(event, "transformedFileCount"),
            total: number(event, "totalFileCount"),
        },
        Some("bundle_build_done") => Rendered::Success(format!("Bundled {}", bundle_name(event))),
        Some("bundle_build_failed") => Rendered::Error(format!(
            "Bundling {} failed{}",
            bundle_name(event),
            text(event, "error")
                .map(|e| format!(": {}", e))
                .unwrap_or_default()
        )),
        Some("client_log") => {
            let level = text(event, "level").unwrap_or_else(|| "log".to_string());
            let message = match event.field("data") {
                Some(Value::Array(parts)) => parts
                    .iter()
                    .map(|part| match part {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(" "),
                _ => String::new(),
            };
            Rendered::Client { level, message }
        }
        Some("file_changed") => Rendered::Info(format!(
            "{} {}",
            text(event, "change").unwrap_or_else(|| "changed".to_string()),
            text(event, "filePath").unwrap_or_default()
        )),
        _ => Rendered::Ignored,
    }
}

impl TerminalReporter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Reporter for TerminalReporter {
    fn update(&self, event: &ReporterEvent) {
        match render(event) {
            Rendered::Success(message) => {
                if let Some(progress) = self.progress.lock().take() {
                    progress.finish();
                }
                ui::success(&message);
            }
            Rendered::Info(message) => ui::info(&message),
            Rendered::Error(message) => {
                if let Some(progress) = self.progress.lock().take() {
                    progress.abandon();
                }
                ui::error(&message);
            }
            Rendered::Client { level, message } => match level.as_str() {
                "error" => ui::error(&message),
                "warn" => ui::warning(&message),
                _ => ui::client(&level, &message),
            },
            Rendered::BuildStarted(bundle) => {
                let mut slot = self.progress.lock();
                if let Some(previous) = slot.take() {
                    previous.finish();
                }
                *slot = Some(TransformProgress::start(&bundle));
            }
            Rendered::Progress { done, total } => {
                if let Some(progress) = self.progress.lock().as_ref() {
                    progress.update(done, total);
                }
            }
            Rendered::Ignored => {
                debug!(kind = event.kind().unwrap_or("<none>"), "Unrendered event");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Map, json};

    fn event(kind: &str, fields: Value) -> ReporterEvent {
        let fields: Map<String, Value> = serde_json::from_value(fields).unwrap();
        ReporterEvent::new(kind, fields)
    }

    #[test]
    fn test_render_initialize() {
        assert_eq!(
            render(&event("initialize_done", json!({ "port": 8081 }))),
            Rendered::Success("Dev server ready on port 8081".to_string())
        );
        assert_eq!(
            render(&event("initialize_failed", json!({ "error": "EADDRINUSE" }))),
            Rendered::Error("Dev server failed to start: EADDRINUSE".to_string())
        );
    }

    #[test]
    fn test_render_build_lifecycle() {
        let started = event(
            "bundle_build_started",
            json!({ "bundleDetails": { "entryFile": "index.js" } }),
        );
        assert_eq!(render(&started), Rendered::BuildStarted("index.js".to_string()));

        let progressed = event(
            "bundle_transform_progressed",
            json!({ "transformedFileCount": 3, "totalFileCount": 10 }),
        );
        assert_eq!(render(&progressed), Rendered::Progress { done: 3, total: 10 });

        let failed = event("bundle_build_failed", json!({ "bundle": "main" }));
        assert_eq!(render(&failed), Rendered::Error("Bundling main failed".to_string()));
    }

    #[test]
    fn test_render_client_log_joins_parts() {
        let log = event("client_log", json!({ "level": "warn", "data": ["slow", 42] }));
        assert_eq!(
            render(&log),
            Rendered::Client {
                level: "warn".to_string(),
                message: "slow 42".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_and_untyped_events_are_ignored() {
        assert_eq!(render(&ReporterEvent::kind_only("dep_graph_loaded")), Rendered::Ignored);
        assert_eq!(render(&ReporterEvent::from(json!({ "x": 1 }))), Rendered::Ignored);
    }

    #[test]
    fn test_progress_bar_lifecycle() {
        let reporter = TerminalReporter::new();
        reporter.update(&ReporterEvent::kind_only("bundle_build_started"));
        assert!(reporter.progress.lock().is_some());

        reporter.update(&event(
            "bundle_transform_progressed",
            json!({ "transformedFileCount": 1, "totalFileCount": 2 }),
        ));
        assert_eq!(reporter.progress.lock().as_ref().map(|p| p.position()), Some(1));

        reporter.update(&ReporterEvent::kind_only("bundle_build_done"));
        assert!(reporter.progress.lock().is_none());
    }
}
