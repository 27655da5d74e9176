//! Tracing setup for test binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs a fmt subscriber writing through the test output capture.
///
/// Honours `RUST_LOG`, defaulting to `logic_harness=info`. Safe to call
/// from every test; only the first call installs anything.
pub fn init_test_logging() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("logic_harness=info"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_test_writer()
        .with_target(false)
        .compact();

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init();
}
