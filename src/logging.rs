use std::io;
use tracing_subscriber::EnvFilter;

/// The environment variable holding the log filter, e.g. `WAVECAT_LOG=debug`.
pub const LOG_ENV: &str = "WAVECAT_LOG";

const DEFAULT_FILTER: &str = "warn";

/// Send logs to stderr so stdout only carries the painted text.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .ok();
}
