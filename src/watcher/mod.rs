//! Remote object watching.
//!
//! This module provides:
//! - Watch path parsing and validation
//! - The watch set holding each path's last-seen fingerprint
//! - The polling watcher and its event/error streams

mod events;
mod path;
mod set;
#[allow(clippy::module_inception)]
mod watcher;

pub use events::{Event, FetchError};
pub use path::WatchPath;
pub use watcher::{
    WatchStreams, Watcher, WatcherConfig, DEFAULT_FETCH_TIMEOUT, DEFAULT_POLL_INTERVAL,
};
