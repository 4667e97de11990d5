//! Tracing initialisation for tests.
//!
//! Call [`init_test_tracing`] at the top of a test that wants engine events
//! captured by the test harness. Initialisation happens at most once per
//! process, so every test may call it.

use tracing_subscriber::EnvFilter;

/// Installs a subscriber writing to the test-harness writer, filtered by
/// `RUST_LOG` (default `info`).
///
/// ```ignore
/// #[test]
/// fn my_test() {
///     querycontext_test_utils::tracing_setup::init_test_tracing();
///     tracing::debug!("visible with RUST_LOG=debug");
/// }
/// ```
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_test_writer()
        .try_init();
}
