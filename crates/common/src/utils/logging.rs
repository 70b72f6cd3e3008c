use std::io;
use tracing_subscriber::{fmt, EnvFilter};

/// Filter used when `RUST_LOG` is unset. Kept at `warn` so the menu stays readable.
pub const DEFAULT_FILTER: &str = "warn";

/// Initialize tracing subscriber with compact human-readable output.
/// - Respects `RUST_LOG` if set
/// - Falls back to [`DEFAULT_FILTER`]
/// - Writes to stderr so prompts and tables on stdout are not interleaved with logs
pub fn init_logging_default() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_writer(io::stderr)
        .try_init();
}

/// Initialize tracing subscriber with JSON structured output.
/// - Respects `RUST_LOG` if set, defaults to [`DEFAULT_FILTER`]
/// - Emits one JSON object per line on stderr
pub fn init_logging_json() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .json()
        .with_writer(io::stderr)
        .try_init();
}
