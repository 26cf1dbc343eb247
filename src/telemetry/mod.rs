//! Logging and metrics.
//!
//! This module provides:
//! - `tracing` subscriber setup with plain or JSON output
//! - Prometheus counters for poll cycles, fetches, and change events

mod metrics;
mod observability;

pub use metrics::{
    init_metrics, render_metrics, CHANGE_EVENTS, FETCHES_TOTAL, POLL_CYCLES, WATCHED_PATHS,
};
pub use observability::init_tracing;
