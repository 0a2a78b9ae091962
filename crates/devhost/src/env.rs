//! Environment switches read once at bootstrap.

/// Name of the continuous-integration flag.
pub const CI_FLAG: &str = "CI";

/// Name of the flag that turns telemetry off.
pub const NO_TELEMETRY_FLAG: &str = "DEVHOST_NO_TELEMETRY";

/// Snapshot of the environment flags the orchestrator reacts to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DevEnvironment {
    /// Running under continuous integration
    pub ci: bool,
    /// Telemetry disabled by the user
    pub no_telemetry: bool,
}

impl DevEnvironment {
    /// Read the flags from the current process environment.
    pub fn from_process() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the flags through an arbitrary lookup function.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            ci: lookup(CI_FLAG).as_deref().is_some_and(is_truthy),
            no_telemetry: lookup(NO_TELEMETRY_FLAG).as_deref().is_some_and(is_truthy),
        }
    }
}

/// Boolish parsing: `1`, `true`, `yes` and `on` (any case) are set.
fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup_with(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |name: &str| {
            pairs
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.to_string())
        }
    }

    #[test]
    fn test_unset_flags() {
        let env = DevEnvironment::from_lookup(lookup_with(&[]));
        assert_eq!(env, DevEnvironment::default());
    }

    #[test]
    fn test_truthy_values() {
        for value in ["1", "true", "TRUE", "yes", "On"] {
            let env = DevEnvironment::from_lookup(move |name| {
                (name == CI_FLAG).then(|| value.to_string())
            });
            assert!(env.ci, "{} should enable CI", value);
        }
    }

    #[test]
    fn test_falsy_values() {
        for value in ["0", "false", "", "no"] {
            let env = DevEnvironment::from_lookup(move |name| {
                (name == CI_FLAG).then(|| value.to_string())
            });
            assert!(!env.ci, "{:?} should not enable CI", value);
        }
    }

    #[test]
    fn test_no_telemetry_flag() {
        let env = DevEnvironment::from_lookup(lookup_with(&[(NO_TELEMETRY_FLAG, "1")]));
        assert!(env.no_telemetry);
        assert!(!env.ci);
    }
}
