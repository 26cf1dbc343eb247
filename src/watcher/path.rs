//! Watch path parsing.

use std::fmt;
use std::str::FromStr;

use crate::error::WatcherError;

const SCHEME_SEPARATOR: &str = "://";

/// Identifier of a remote object, `<scheme>://<container>/<name>`.
///
/// Equality, ordering, and hashing use the full original string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WatchPath {
    raw: String,
    scheme_end: usize,
    container_end: usize,
}

impl WatchPath {
    /// Parse and validate a watch path.
    ///
    /// # Errors
    ///
    /// Returns `WatcherError::InvalidPath` if the scheme separator is
    /// missing, or the scheme, container, or object name is empty.
    pub fn parse(raw: impl Into<String>) -> Result<Self, WatcherError> {
        let raw = raw.into();

        let Some(scheme_end) = raw.find(SCHEME_SEPARATOR) else {
            return Err(WatcherError::invalid_path(raw, "missing '://' separator"));
        };
        if scheme_end == 0 {
            return Err(WatcherError::invalid_path(raw, "empty scheme"));
        }

        let rest_start = scheme_end + SCHEME_SEPARATOR.len();
        let Some(slash) = raw[rest_start..].find('/') else {
            return Err(WatcherError::invalid_path(raw, "missing object name"));
        };
        let container_end = rest_start + slash;

        if container_end == rest_start {
            return Err(WatcherError::invalid_path(raw, "empty container"));
        }
        if container_end + 1 == raw.len() {
            return Err(WatcherError::invalid_path(raw, "missing object name"));
        }

        Ok(Self {
            raw,
            scheme_end,
            container_end,
        })
    }

    /// Scheme without the `://` separator, e.g. `s3`.
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.raw[..self.scheme_end]
    }

    /// First segment after the scheme (the bucket).
    #[must_use]
    pub fn container(&self) -> &str {
        &self.raw[self.scheme_end + SCHEME_SEPARATOR.len()..self.container_end]
    }

    /// Remaining segments joined with `/` (the object key).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.raw[self.container_end + 1..]
    }

    /// The full path as given.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for WatchPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for WatchPath {
    type Err = WatcherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for WatchPath {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}
