//! Logging setup for the Devhost CLI.
//!
//! Built on `tracing-subscriber`. The filter is chosen in this order:
//! 1. `--verbose`: DEBUG for devhost crates
//! 2. `--quiet`: ERROR only
//! 3. `RUST_LOG`
//! 4. INFO for devhost crates
//!
//! ```rust,no_run
//! use devhost_cli::logger::init_logger;
//!
//! init_logger(false, false, false);
//! tracing::info!("Starting dev server");
//! ```

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const VERBOSE_FILTER: &str = "devhost=debug,devhost_cli=debug,tower_http=debug";
const QUIET_FILTER: &str = "devhost=error,devhost_cli=error";
const DEFAULT_FILTER: &str = "devhost=info,devhost_cli=info";

/// Pick the filter directives for the given flags.
///
/// `None` means the caller should honour `RUST_LOG` first.
pub fn filter_directives(verbose: bool, quiet: bool) -> Option<&'static str> {
    if verbose {
        Some(VERBOSE_FILTER)
    } else if quiet {
        Some(QUIET_FILTER)
    } else {
        None
    }
}

/// Initialize the global tracing subscriber. Call once, before any logging.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let filter = match filter_directives(verbose, quiet) {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
    };
    init_logger_with_filter(filter, no_color);
}

/// Initialize logger with a custom environment filter.
pub fn init_logger_with_filter(filter: EnvFilter, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
