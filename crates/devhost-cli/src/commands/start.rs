//! `devhost start`: bootstrap the dev server and serve until interrupted.

use crate::cli::StartArgs;
use crate::collaborators;
use crate::commands::canonical_root;
use crate::error::Result;
use crate::reporter::TerminalReporter;
use crate::ui::{self, UiNotify};
use devhost::{DevEnvironment, ServerLauncher};
use std::sync::Arc;
use tokio::signal;

/// Execute the start command.
///
/// 1. Resolve the project root and read environment switches
/// 2. Bootstrap through [`ServerLauncher`]
/// 3. Serve until Ctrl+C, then shut the server down gracefully
pub async fn execute(args: StartArgs) -> Result<()> {
    let project_root = canonical_root(&args.project_root)?;
    let env = DevEnvironment::from_process();
    ui::info(&format!("Project: {}", project_root.display()));

    let launcher = ServerLauncher::new(
        collaborators::for_project(&project_root, &env),
        Arc::new(TerminalReporter::new()),
    )
    .with_notify(Arc::new(UiNotify))
    .with_environment(env);

    let handle = launcher
        .bootstrap(&project_root, args.start_options())
        .await?;

    ui::success(&format!("Serving at {}", handle.server.url()));
    ui::info("Press Ctrl+C to stop");

    signal::ctrl_c().await?;
    ui::info("Shutting down dev server...");
    handle.server.shutdown().await?;

    Ok(())
}
