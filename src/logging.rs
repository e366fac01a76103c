//! Subscriber setup for binaries and examples embedding the crate.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Installs a stderr `fmt` subscriber filtered by `RUST_LOG`.
///
/// Falls back to `default_directive` (for example `"info"` or
/// `"respiration_monitor=debug"`) when `RUST_LOG` is unset or invalid.
/// Returns `false` if a global subscriber was already installed, so calling
/// it twice is harmless.
pub fn init_logging(default_directive: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(filter),
        )
        .try_init()
        .is_ok()
}
