//! Progress bar for bundle transforms.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const TEMPLATE: &str = "{spinner:.green} {msg} [{bar:30.cyan/blue}] {pos}/{len}";

/// One bundle build's transform progress.
///
/// The total is not known up front; it grows as the bundler discovers files.
pub struct TransformProgress {
    bar: ProgressBar,
}

impl TransformProgress {
    pub fn start(bundle: &str) -> Self {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::with_template(TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓▒░");
        bar.set_style(style);
        bar.set_message(bundle.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    /// Record `done` of `total` files transformed.
    pub fn update(&self, done: u64, total: u64) {
        self.bar.set_length(total.max(done));
        self.bar.set_position(done);
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    pub fn finish(self) {
        self.bar.finish_and_clear();
    }

    pub fn abandon(self) {
        self.bar.abandon();
    }
}
