use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding the log filter, e.g. `CASHBACK_LOG=debug`.
pub(crate) const LOG_ENV: &str = "CASHBACK_LOG";

/// Send diagnostics to stderr so they never mix with command output.
///
/// Only warnings are shown unless [LOG_ENV] asks for more.
pub(crate) fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let stderr_log = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time();

    // Ignore the error: a subscriber may already be set (e.g. in tests).
    let _ = tracing_subscriber::registry()
        .with(stderr_log.with_filter(filter))
        .try_init();
}
