//! Prometheus metrics definitions.

use once_cell::sync::Lazy;
use prometheus::{
    register_int_counter, register_int_counter_vec, register_int_gauge, Encoder, IntCounter,
    IntCounterVec, IntGauge, TextEncoder,
};

use crate::{Error, Result};

/// Completed poll cycles.
pub static POLL_CYCLES: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("csnotify_poll_cycles_total", "Total number of completed poll cycles")
        .unwrap()
});

/// Fingerprint fetches by outcome (`ok`, `error`).
pub static FETCHES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "csnotify_fetches_total",
        "Total number of fingerprint fetches",
        &["outcome"]
    )
    .unwrap()
});

/// Change events handed to consumers.
pub static CHANGE_EVENTS: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("csnotify_change_events_total", "Total number of change events")
        .unwrap()
});

/// Paths currently watched, across all watchers in the process.
pub static WATCHED_PATHS: Lazy<IntGauge> = Lazy::new(|| {
    register_int_gauge!("csnotify_watched_paths", "Number of watched object paths").unwrap()
});

/// Initialize all metrics (call once at startup).
pub fn init_metrics() {
    // Access lazy statics to register them
    let _ = &*POLL_CYCLES;
    let _ = &*FETCHES_TOTAL;
    let _ = &*CHANGE_EVENTS;
    let _ = &*WATCHED_PATHS;

    tracing::debug!("Prometheus metrics initialized");
}

/// Render every registered metric in the Prometheus text format.
///
/// # Errors
///
/// Returns an error if encoding fails.
pub fn render_metrics() -> Result<String> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| Error::internal(format!("failed to encode metrics: {e}")))?;

    String::from_utf8(buffer).map_err(|e| Error::internal(format!("metrics not UTF-8: {e}")))
}
