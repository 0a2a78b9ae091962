//! Concrete collaborator set for a project directory.

use crate::devtools::DevToolsMiddlewareFactory;
use crate::platforms::MultiPlatformAdjuster;
use crate::project::AppJsonProject;
use crate::resolve::ProjectModules;
use crate::telemetry::FileTelemetry;
use devhost::{Collaborators, DevEnvironment, DisabledTelemetry, Telemetry};
use std::path::Path;
use std::sync::Arc;

/// Wire every bootstrap collaborator for `project_root`.
///
/// Telemetry is swapped for a pass-through when the environment opts out.
pub fn for_project(project_root: &Path, env: &DevEnvironment) -> Collaborators {
    let telemetry: Arc<dyn Telemetry> = if env.no_telemetry {
        Arc::new(DisabledTelemetry)
    } else {
        Arc::new(FileTelemetry::for_project(project_root))
    };

    Collaborators {
        resolver: Arc::new(ProjectModules),
        project: Arc::new(AppJsonProject),
        adjuster: Arc::new(MultiPlatformAdjuster),
        dev_tools: Arc::new(DevToolsMiddlewareFactory),
        telemetry,
    }
}
