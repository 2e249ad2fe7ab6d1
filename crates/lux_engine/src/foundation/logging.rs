//! Logging utilities and structured logging support

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system with a fallback filter
///
/// `RUST_LOG` still wins when it is set; `default_level` is only used
/// when the environment does not specify a filter. Calling this more than
/// once is harmless (later calls are ignored).
pub fn init_with_level(default_level: &str) {
    let env = env_logger::Env::default().default_filter_or(default_level);
    let _ = env_logger::Builder::from_env(env).try_init();
}

/// Initialize logging for unit tests (captured by the test harness)
pub fn init_for_tests() {
    let _ = env_logger::builder().is_test(true).try_init();
}
