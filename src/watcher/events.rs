//! Values delivered on the watcher's output streams.

use super::path::WatchPath;
use crate::error::SourceError;

/// A watched object's fingerprint changed since the last check.
///
/// Carries no content; consumers re-fetch the object themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Path of the changed object.
    pub path: WatchPath,
}

impl Event {
    /// Create a change event for `path`.
    #[must_use]
    pub const fn new(path: WatchPath) -> Self {
        Self { path }
    }
}

/// A fingerprint fetch failed during a poll cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    /// Path whose fetch failed.
    pub path: WatchPath,
    /// What went wrong, with the backend code preserved.
    pub error: SourceError,
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.error, f)
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}
