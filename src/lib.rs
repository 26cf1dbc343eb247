//! csnotify
//!
//! Change notifications for objects in cloud storage. A [`Watcher`] polls
//! the fingerprint (ETag) of every watched object and reports each change
//! on an event stream, and each failed fetch on an error stream.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod source;
pub mod telemetry;
pub mod watcher;

pub use config::Config;
pub use error::{Error, ErrorCode, Result, SourceError, WatcherError};
pub use source::{Fingerprint, FingerprintSource, MemorySource, S3Options, S3Source};
pub use watcher::{Event, FetchError, WatchPath, WatchStreams, Watcher, WatcherConfig};
