//! Status lines written to stderr.

use super::colors_enabled;
use owo_colors::OwoColorize;

/// Print a success message to stderr.
///
/// ```no_run
/// devhost_cli::ui::success("Dev server ready on port 8081");
/// ```
pub fn success(message: &str) {
    if colors_enabled() {
        eprintln!("{} {}", "✓".green().bold(), message);
    } else {
        eprintln!("✓ {}", message);
    }
}

/// Print an info message to stderr.
pub fn info(message: &str) {
    if colors_enabled() {
        eprintln!("{} {}", "ℹ".blue().bold(), message);
    } else {
        eprintln!("ℹ {}", message);
    }
}

/// Print a warning message to stderr.
pub fn warning(message: &str) {
    if colors_enabled() {
        eprintln!("{} {}", "⚠".yellow().bold(), message.yellow());
    } else {
        eprintln!("⚠ {}", message);
    }
}

/// Print an error message to stderr.
pub fn error(message: &str) {
    if colors_enabled() {
        eprintln!("{} {}", "✗".red().bold(), message.red());
    } else {
        eprintln!("✗ {}", message);
    }
}

/// Print client-side console output, tagged with its level.
pub fn client(level: &str, message: &str) {
    let tag = format!("[{}]", level);
    if colors_enabled() {
        eprintln!("{} {}", tag.dimmed(), message);
    } else {
        eprintln!("{} {}", tag, message);
    }
}
