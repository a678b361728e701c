//! Tracing setup for the `bgroups` binary.
//!
//! Log lines go to stderr so stdout stays clean for JSON output. The
//! filter comes from `BG_LOG` (same syntax as `RUST_LOG`), falling back to
//! [`DEFAULT_LOG_FILTER`] or [`VERBOSE_LOG_FILTER`] with `-v`.

use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding a log filter directive.
pub const LOG_ENV: &str = "BG_LOG";

pub const DEFAULT_LOG_FILTER: &str = "breakout_groups=warn";
pub const VERBOSE_LOG_FILTER: &str = "breakout_groups=debug";

/// Pick the filter directive: `BG_LOG` wins, then the verbosity default.
pub fn filter_directive(env_value: Option<&str>, verbose: bool) -> String {
    match env_value.map(str::trim) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ if verbose => VERBOSE_LOG_FILTER.to_string(),
        _ => DEFAULT_LOG_FILTER.to_string(),
    }
}

/// Install the global subscriber. Calling it twice is a no-op.
pub fn init_logging(verbose: bool) {
    let env_value = std::env::var(LOG_ENV).ok();
    let directive = filter_directive(env_value.as_deref(), verbose);
    let filter = EnvFilter::try_new(&directive)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_filter(filter),
        )
        .try_init();
}
