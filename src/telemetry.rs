//! Logging setup.
//!
//! Library code only emits `tracing` events. Binaries call [`init`] once to
//! install a formatting subscriber; `RUST_LOG` overrides the configured level.

use tracing_subscriber::EnvFilter;

/// Install a global fmt subscriber writing to stderr.
///
/// Returns `false` if a global subscriber was already set.
pub fn init(default_level: &str) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(build_env_filter(default_level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_ok()
}

fn build_env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Only this test touches RUST_LOG.
    #[test]
    fn test_env_filter_resolution() {
        std::env::set_var("RUST_LOG", "debug");
        assert_eq!(build_env_filter("info").to_string(), "debug");

        std::env::remove_var("RUST_LOG");
        assert_eq!(build_env_filter("info").to_string(), "info");
        assert_eq!(build_env_filter("not==a==level").to_string(), "warn");
    }

    #[test]
    fn test_second_init_reports_existing_subscriber() {
        let _ = init("warn");
        assert!(!init("warn"));
    }
}
