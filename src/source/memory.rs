//! In-memory fingerprint source.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{Fingerprint, FingerprintSource};
use crate::error::{ErrorCode, SourceError};
use crate::watcher::WatchPath;

#[derive(Debug, Default)]
struct Objects {
    fingerprints: HashMap<String, Fingerprint>,
    failures: HashMap<String, SourceError>,
}

/// Fingerprint source backed by a map held in memory.
///
/// Objects absent from the map report `ErrorCode::NotFound`.
#[derive(Debug)]
pub struct MemorySource {
    scheme: String,
    objects: Mutex<Objects>,
    fetches: AtomicU64,
}

impl MemorySource {
    /// Create an empty source serving `scheme`.
    pub fn new(scheme: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            objects: Mutex::new(Objects::default()),
            fetches: AtomicU64::new(0),
        }
    }

    /// Set the fingerprint reported for `path`.
    pub fn set(&self, path: impl Into<String>, fingerprint: impl Into<Fingerprint>) {
        self.objects
            .lock()
            .fingerprints
            .insert(path.into(), fingerprint.into());
    }

    /// Delete the object at `path`.
    pub fn remove(&self, path: &str) {
        self.objects.lock().fingerprints.remove(path);
    }

    /// Make the next fetch of `path` fail with `error`.
    pub fn fail_next(&self, path: impl Into<String>, error: SourceError) {
        self.objects.lock().failures.insert(path.into(), error);
    }

    /// Total fetches served, successful or not.
    #[must_use]
    pub fn fetch_count(&self) -> u64 {
        self.fetches.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl FingerprintSource for MemorySource {
    fn scheme(&self) -> &str {
        &self.scheme
    }

    async fn fetch(&self, path: &WatchPath) -> Result<Fingerprint, SourceError> {
        self.fetches.fetch_add(1, Ordering::Relaxed);

        let mut objects = self.objects.lock();
        if let Some(err) = objects.failures.remove(path.as_str()) {
            return Err(err);
        }

        objects
            .fingerprints
            .get(path.as_str())
            .cloned()
            .ok_or_else(|| SourceError::backend(path.as_str(), ErrorCode::NotFound, "no such object"))
    }
}
