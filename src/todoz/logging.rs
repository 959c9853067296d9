//! Diagnostic logging for the binary.
//!
//! The library only emits `tracing` events; installing a subscriber is up to
//! the host. The CLI writes to stderr so stdout stays clean for output.
//! `TODOZ_LOG` takes any `EnvFilter` directive and wins over `--verbose`.

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "TODOZ_LOG";

pub fn default_directive(verbose: bool) -> &'static str {
    if verbose { "todoz=debug" } else { "warn" }
}

/// Installs the stderr subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_enables_debug_for_the_crate() {
        assert_eq!(default_directive(true), "todoz=debug");
        assert_eq!(default_directive(false), "warn");
    }

    #[test]
    fn init_is_idempotent() {
        init_logging(false);
        init_logging(true);
    }
}
