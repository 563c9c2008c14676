/*
 * Log setup for the binary. The library itself only emits `tracing` events
 * and never installs a subscriber.
 */

use tracing_subscriber::EnvFilter;

/// Overrides the verbosity flags when set, e.g. `TRAFFIC_LIGHT_LOG=debug`.
pub const LOG_ENV: &str = "TRAFFIC_LIGHT_LOG";

pub const fn verbosity_to_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Safe to call more than once; later calls are ignored.
pub fn init_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(verbosity_to_directive(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_thread_names(true)
        .with_target(verbosity >= 2)
        .with_writer(std::io::stderr)
        .try_init();
}
