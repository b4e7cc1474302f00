//! Diagnostic logging setup.

use tracing_subscriber::EnvFilter;

/// Level used when `RUST_LOG` is unset.
const DEFAULT_LEVEL: &str = "warn";

/// Level used when `RUST_LOG` is unset and `--verbose` is given.
const VERBOSE_LEVEL: &str = "debug";

/// Installs a stderr subscriber filtered by `RUST_LOG`.
///
/// Diagnostics go to stderr so `--json` output on stdout stays parseable.
pub fn init(verbose: bool) {
    let fallback = if verbose { VERBOSE_LEVEL } else { DEFAULT_LEVEL };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    // A subscriber may already be installed (e.g., by a test harness).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
