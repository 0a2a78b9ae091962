//! Watch-mode decision.
//!
//! The decision itself is pure ([`WatchDecision::decide`]); the warning is
//! delivered through an injected [`Notify`] so callers control where it
//! ends up.

use crate::env::{DevEnvironment, CI_FLAG};

/// Receives human-readable notices from the orchestrator.
pub trait Notify: Send + Sync {
    fn warn(&self, message: &str);
}

/// Notifier that logs through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotify;

impl Notify for TracingNotify {
    fn warn(&self, message: &str) {
        tracing::warn!("{}", message);
    }
}

/// Whether file watching should run, and what to tell the user if not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchDecision {
    enabled: bool,
    warning: Option<String>,
}

impl WatchDecision {
    pub fn decide(env: &DevEnvironment) -> Self {
        if env.ci {
            Self {
                enabled: false,
                warning: Some(format!(
                    "Bundler is running in CI mode, reloads are disabled. Remove {}=true to enable watch mode.",
                    CI_FLAG
                )),
            }
        } else {
            Self {
                enabled: true,
                warning: None,
            }
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn warning(&self) -> Option<&str> {
        self.warning.as_deref()
    }
}

/// Decide watch mode and emit the CI warning, if any, exactly once.
pub fn is_watch_enabled(env: &DevEnvironment, notify: &dyn Notify) -> bool {
    let decision = WatchDecision::decide(env);
    if let Some(warning) = decision.warning() {
        notify.warn(warning);
    }
    decision.enabled()
}
