//! Terminal UI utilities: status lines, progress and colour detection.
//!
//! ```no_run
//! use devhost_cli::ui;
//!
//! ui::init_colors(false);
//! ui::info("Starting dev server...");
//! ui::success("Dev server ready");
//! ```

mod messages;
mod progress;

pub use messages::{client, error, info, success, warning};
pub use progress::TransformProgress;

use std::sync::atomic::{AtomicBool, Ordering};

static COLORS: AtomicBool = AtomicBool::new(true);

pub(crate) fn colors_enabled() -> bool {
    COLORS.load(Ordering::Relaxed)
}

/// Check if color output should be enabled.
///
/// `NO_COLOR` wins over `FORCE_COLOR`; otherwise stderr must be a terminal.
pub fn should_use_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }
    console::user_attended_stderr()
}

/// Apply colour support for the process. `--no-color` forces it off.
pub fn init_colors(no_color: bool) {
    let enabled = !no_color && should_use_color();
    console::set_colors_enabled(enabled);
    console::set_colors_enabled_stderr(enabled);
    COLORS.store(enabled, Ordering::Relaxed);
}

/// Watch-mode notices rendered as terminal warnings.
#[derive(Debug, Default, Clone, Copy)]
pub struct UiNotify;

impl devhost::Notify for UiNotify {
    fn warn(&self, message: &str) {
        warning(message);
    }
}
