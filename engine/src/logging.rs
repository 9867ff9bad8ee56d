//! Logging setup for binaries.
//!
//! Library code only uses the `log` macros. Hosts call [`init`] once.

/// Initializes `env_logger`, honoring `RUST_LOG` and defaulting to `info`.
///
/// Calling it more than once is harmless.
pub fn init() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
}

/// Variant for tests: captures output through the test harness.
pub fn init_for_tests() {
    let _ = env_logger::builder().is_test(true).try_init();
}
