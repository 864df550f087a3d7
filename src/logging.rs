//! Tracing subscriber setup.

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `firedrill=info` (or
/// `firedrill=debug` with `--debug`). Logs go to stderr so they never
/// interleave with the conversation transcript on stdout.
pub fn init(debug: bool) {
    let default_directive = if debug {
        "firedrill=debug"
    } else {
        "firedrill=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
