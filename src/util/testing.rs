//! Test-only helpers.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static LOGGING: Once = Once::new();

/// Route `tracing` output of the crate into the test harness.
///
/// Safe to call from every test; only the first call installs a subscriber.
/// `RUST_LOG` overrides the default `feedtree=trace` filter.
pub fn init_test_setup() {
    LOGGING.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("feedtree=trace"));
        let layer = fmt::layer()
            .with_target(true)
            .with_test_writer()
            .with_filter(filter);

        // another harness may already own the global dispatcher
        if let Err(e) = tracing_subscriber::registry().with(layer).try_init() {
            eprintln!("test logging not installed: {}", e);
        }
        tracing::debug!("test logging ready");
    });
}
