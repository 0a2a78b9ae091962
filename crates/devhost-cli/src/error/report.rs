//! Miette diagnostic conversion for CLI errors.

use crate::error::CliError;
use miette::Report;

/// Convert CliError to miette Report
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Devhost(e) => devhost_error_to_miette(e),
        CliError::Config(e) => miette::miette!("Configuration error: {}", e),
        _ => miette::miette!("{}", err),
    }
}

/// Convert a core bootstrap error to a miette Report
pub fn devhost_error_to_miette(err: devhost::Error) -> Report {
    match err {
        devhost::Error::ProjectResolution {
            project_root,
            message,
        } => miette::miette!(
            help = "Run the command from a project directory containing package.json",
            "Could not resolve bundler for {}: {}",
            project_root.display(),
            message
        ),
        devhost::Error::Launch(message) => miette::miette!(
            help = "Pick another port with --port, or 0 for any free port",
            "Dev server failed to start: {}",
            message
        ),
        other => miette::miette!("{}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_resolution_error_has_help() {
        let report = cli_error_to_miette(CliError::Devhost(devhost::Error::ProjectResolution {
            project_root: PathBuf::from("/tmp/app"),
            message: "package.json not found".to_string(),
        }));
        assert!(report.to_string().contains("/tmp/app"));
        let help = report.help().map(|h| h.to_string()).unwrap_or_default();
        assert!(help.contains("package.json"));
    }

    #[test]
    fn test_other_errors_keep_message() {
        let report = cli_error_to_miette(CliError::FileNotFound(PathBuf::from("/srv/app")));
        assert_eq!(report.to_string(), "File not found: /srv/app");
    }
}
