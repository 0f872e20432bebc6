//! Process-wide tracing setup.

/// Subscriber configuration.
pub mod tracing;

pub use crate::tracing::{LogFormat, LogSettings};

/// Initialize structured JSON logging filtered by `RUST_LOG` (default `info`).
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init() {
    tracing::init(&LogSettings::from_env());
}

/// Human-readable output captured by the test harness.
pub fn init_for_tests() {
    tracing::init(&LogSettings {
        default_filter: "debug".to_string(),
        format: LogFormat::Pretty,
        test_writer: true,
    });
}
