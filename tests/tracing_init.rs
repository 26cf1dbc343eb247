//! Tracing setup runs in its own test binary since the subscriber is global.

use csnotify::telemetry::init_tracing;

#[test]
fn test_init_tracing_plain_text() {
    std::env::remove_var("RUST_LOG");
    init_tracing("debug", false);

    assert!(tracing::enabled!(tracing::Level::DEBUG));
    assert!(!tracing::enabled!(tracing::Level::TRACE));
    tracing::debug!(path = "s3://bucket/key", "Logged with file and line");
}
