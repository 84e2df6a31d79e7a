//! # Logging Setup
//!
//! Compact tracing output on stderr so stdout stays the calculation
//! result. `RUST_LOG` wins when set; otherwise `-v` flags raise the level.

use tracing_subscriber::EnvFilter;

/// Initializes the global subscriber. Safe to call once per process.
pub fn init(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // try_init so a second call (tests) is a no-op instead of a panic
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}
