//! Logging setup for the provider process.
//!
//! All logs go to **stderr**; stdout carries the handshake line the host
//! reads to find the gRPC address.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: log filter (e.g. `info`, `pexip_infinity_provider=debug`)
//!
//! ```bash
//! RUST_LOG=pexip_infinity_provider::infinity=debug ./pexip-infinity-provider
//! ```

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn filter_or(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

fn stderr_layer<S>() -> impl tracing_subscriber::Layer<S>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
}

/// Initialize logging at `info` unless `RUST_LOG` says otherwise.
///
/// # Panics
///
/// Panics if a global subscriber has already been set.
pub fn init_logging() {
    init_logging_with_default("info");
}

/// Initialize logging with a custom default level used when `RUST_LOG`
/// is not set.
///
/// # Panics
///
/// Panics if a global subscriber has already been set.
pub fn init_logging_with_default(default_level: &str) {
    tracing_subscriber::registry()
        .with(filter_or(default_level))
        .with(stderr_layer())
        .init();
}

/// Try to initialize logging, returning false if a subscriber is already set.
pub fn try_init_logging() -> bool {
    tracing_subscriber::registry()
        .with(filter_or("info"))
        .with(stderr_layer())
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    // The global subscriber can only be set once per process, so these
    // tests stick to filter parsing.

    use super::*;

    #[test]
    fn test_env_filter_parsing() {
        assert!(EnvFilter::try_new("info").is_ok());
        assert!(EnvFilter::try_new("pexip_infinity_provider=debug").is_ok());
        assert!(EnvFilter::try_new("warn,pexip_infinity_provider::infinity=trace").is_ok());
    }

    #[test]
    fn test_try_init_logging_is_idempotent() {
        let _ = try_init_logging();
        assert!(!try_init_logging());
    }
}
