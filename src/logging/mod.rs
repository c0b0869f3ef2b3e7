// Diagnostic logging setup
//
// Library code logs through `tracing`; the binary installs a single fmt
// subscriber writing to stderr so log lines never mix with command output.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set.
pub fn default_filter(debug: bool) -> &'static str {
    if debug {
        "taskkeeper=debug"
    } else {
        "warn"
    }
}

/// Install the global subscriber. `RUST_LOG` wins over `debug`.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing(debug: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(debug)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
