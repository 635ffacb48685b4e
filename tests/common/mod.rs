use std::sync::Once;

static INIT: Once = Once::new();

/// Installs a minimal env-filter-driven subscriber once per test binary, so
/// `RUST_LOG=trace cargo test` surfaces the engine's rehash-step events.
/// A no-op after the first call.
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
