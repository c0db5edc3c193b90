//! Tracing setup.

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the global subscriber.
///
/// `RUST_LOG` controls filtering and defaults to `info`; set
/// `LOG_FORMAT=json` for machine-readable output.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        fmt()
            .with_env_filter(filter)
            .json()
            .with_current_span(true)
            .init();
    } else {
        fmt().with_env_filter(filter).init();
    }
}
