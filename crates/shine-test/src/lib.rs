pub use shine_test_macros::test;
use std::sync::Once;

static INIT: Once = Once::new();

/// Test setup executed before each test.
///
/// Logging is configured by `RUST_LOG` and defaults to `info`. Captured by the test harness, the output is
/// shown only for the failing tests.
pub fn setup_test() {
    INIT.call_once(|| {
        let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .is_test(true)
            .try_init();
        color_backtrace::install();
        log::trace!("Test environment initialized");
    });
}
