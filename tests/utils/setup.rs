use tracing_subscriber::EnvFilter;

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

/// Installs a test-writer subscriber once per test binary.
///
/// Honours `RUST_LOG`; defaults to debug output from this crate.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "olympiad_data=debug".into()),
        )
        .with_test_writer()
        .try_init();
}
