use std::io;
use tracing_subscriber::{fmt, EnvFilter};

/// Default directive when neither `RUST_LOG` nor the config provides one.
pub const DEFAULT_FILTER: &str = "info,reqwest=warn";

fn filter_or(fallback: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(fallback.unwrap_or(DEFAULT_FILTER)))
}

/// Initialize tracing subscriber with compact human-readable output.
/// - Respects `RUST_LOG` if set, otherwise `fallback`, otherwise [`DEFAULT_FILTER`]
/// - Writes to stderr so command output on stdout stays clean
pub fn init_logging_default(fallback: Option<&str>) {
    let _ = fmt()
        .with_env_filter(filter_or(fallback))
        .with_target(false)
        .compact()
        .with_writer(io::stderr)
        .try_init();
}

/// Initialize tracing subscriber with JSON structured output.
/// - Respects `RUST_LOG` if set, otherwise `fallback`
/// - Emits one JSON object per event for machine parsing
pub fn init_logging_json(fallback: Option<&str>) {
    let _ = fmt()
        .with_env_filter(filter_or(fallback))
        .with_target(false)
        .json()
        .with_writer(io::stderr)
        .try_init();
}

/// Pick the subscriber by format name (`"json"` or anything else for compact).
pub fn init_logging(format: &str, fallback: Option<&str>) {
    if format.eq_ignore_ascii_case("json") {
        init_logging_json(fallback);
    } else {
        init_logging_default(fallback);
    }
}
