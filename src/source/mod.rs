//! Fingerprint sources.
//!
//! A source answers one question for the watcher: what is the current
//! change fingerprint of this object? This module provides:
//! - The `FingerprintSource` trait consumed by the watcher
//! - An S3 adapter built on opendal
//! - An in-memory source for tests and offline use

mod memory;
mod s3;

use std::fmt;

use async_trait::async_trait;

use crate::error::SourceError;
use crate::watcher::WatchPath;

pub use memory::MemorySource;
pub use s3::{S3Options, S3Source};

/// Opaque content/version token for an object, e.g. an ETag.
///
/// Only equality is meaningful.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Wrap a backend token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Fingerprint {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl From<String> for Fingerprint {
    fn from(token: String) -> Self {
        Self(token)
    }
}

/// Provides the current fingerprint of a remote object.
#[async_trait]
pub trait FingerprintSource: Send + Sync + 'static {
    /// Scheme this source serves, without `://`.
    fn scheme(&self) -> &str;

    /// Fetch the current fingerprint of `path`.
    async fn fetch(&self, path: &WatchPath) -> Result<Fingerprint, SourceError>;
}
