//! Logging setup for the NIF library.
//!
//! Logs go to stderr of the BEAM process through a `tracing-subscriber` fmt
//! layer. Nothing is emitted above `warn` unless asked for.
//!
//! ## Environment Variables
//!
//! 1. **`RUSTYHIGHLIGHT_LOG`** (highest priority) - crate-specific logging control
//! 2. **`RUST_LOG`** - Standard tracing environment variable
//! 3. **Default** - `warn`

use std::env;
use tracing_subscriber::{fmt, EnvFilter};

const LOG_ENV: &str = "RUSTYHIGHLIGHT_LOG";

/// Initialize logging.
///
/// Called from the NIF `load` hook. Safe to call multiple times; a
/// subscriber installed earlier (by the host or another NIF) is left alone.
pub fn init() {
    let filter = filter_directives(env::var(LOG_ENV).ok(), env::var("RUST_LOG").ok());
    let _ = fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}

/// Initialize logging for tests.
///
/// Will not crash if called multiple times or if logging is already
/// initialized by another test.
pub fn test() {
    let filter = filter_directives(env::var(LOG_ENV).ok(), env::var("RUST_LOG").ok());
    let _ = fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_test_writer()
        .try_init();
}

/// Pick the filter directives: `RUSTYHIGHLIGHT_LOG` > `RUST_LOG` > `warn`.
fn filter_directives(crate_log: Option<String>, rust_log: Option<String>) -> String {
    if let Some(crate_log) = crate_log {
        return expand_filter(&crate_log);
    }
    rust_log.unwrap_or_else(|| "warn".to_string())
}

/// Expand a `RUSTYHIGHLIGHT_LOG` value into a full filter string.
///
/// - `debug` becomes `warn,rustyhighlight=debug`
/// - `rustyhighlight::highlight=trace` is used as-is (advanced syntax)
fn expand_filter(value: &str) -> String {
    if value.contains('=') || value.contains(':') || value.contains(',') {
        return value.to_string();
    }
    format!("warn,rustyhighlight={value}")
}
