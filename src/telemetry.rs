//! Telemetry initialization.
//!
//! Log output goes to stderr, filtered by `RESTASH_LOG` (falling back to
//! `RUST_LOG`, defaulting to `warn`). Setting `RESTASH_LOG_FORMAT=json`
//! switches the stderr output to JSON events for log collectors.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

/// Initialize the global tracing subscriber. Call once, before any command
/// runs; a second call is a no-op failure that is deliberately ignored so
/// tests can initialize freely.
pub fn init() {
    let filter = std::env::var("RESTASH_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .map_or_else(|_| EnvFilter::new("warn"), EnvFilter::new);

    let json = std::env::var("RESTASH_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    if json {
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init();
    } else {
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_writer(std::io::stderr),
            )
            .try_init();
    }
}
