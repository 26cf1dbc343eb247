//! Polling watcher for remote objects.
//!
//! One background task walks the watch set once per cycle, asks the
//! fingerprint source for each path's current fingerprint, and reports
//! changes on the event stream and failed fetches on the error stream.

use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::events::{Event, FetchError};
use super::path::WatchPath;
use super::set::{Observation, Snapshot, WatchSet};
use crate::error::{SourceError, WatcherError};
use crate::source::{Fingerprint, FingerprintSource};
use crate::telemetry::{CHANGE_EVENTS, FETCHES_TOTAL, POLL_CYCLES, WATCHED_PATHS};
use crate::{Error, Result};

/// Delay between the end of one poll cycle and the start of the next.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Upper bound on a single fingerprint fetch.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Watcher configuration.
#[derive(Debug, Clone)]
pub struct WatcherConfig {
    /// How often each watched path is re-checked.
    pub poll_interval: Duration,
    /// Events buffered before the polling task waits for the consumer.
    pub event_buffer: usize,
    /// Fetch errors buffered before the polling task waits for the consumer.
    pub error_buffer: usize,
    /// Per-fetch timeout; `None` lets a fetch run as long as the source does.
    pub fetch_timeout: Option<Duration>,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            event_buffer: 1,
            error_buffer: 1,
            fetch_timeout: Some(DEFAULT_FETCH_TIMEOUT),
        }
    }
}

impl WatcherConfig {
    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns an error if the interval, a buffer size, or the timeout is zero.
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval.is_zero() {
            return Err(Error::config("poll interval cannot be 0"));
        }
        if self.event_buffer == 0 {
            return Err(Error::config("event buffer cannot be 0"));
        }
        if self.error_buffer == 0 {
            return Err(Error::config("error buffer cannot be 0"));
        }
        if self.fetch_timeout.is_some_and(|t| t.is_zero()) {
            return Err(Error::config("fetch timeout cannot be 0"));
        }
        Ok(())
    }
}

/// Receiving ends of a watcher's output streams.
///
/// Both streams are bounded. The polling task waits when a buffer is full,
/// so a consumer that never drains `errors` eventually stalls change
/// detection for every path. Both report end of stream once the watcher
/// has been closed and the buffered items are drained.
#[derive(Debug)]
pub struct WatchStreams {
    /// One event per detected fingerprint change.
    pub events: mpsc::Receiver<Event>,
    /// One error per failed fingerprint fetch.
    pub errors: mpsc::Receiver<FetchError>,
}

/// Watches a set of remote objects for fingerprint changes.
#[derive(Debug)]
pub struct Watcher {
    scheme: String,
    watch_set: Arc<Mutex<WatchSet>>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl Watcher {
    /// Create a watcher and start its polling task.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or no tokio runtime
    /// is running.
    pub fn new(
        source: Arc<dyn FingerprintSource>,
        config: &WatcherConfig,
    ) -> Result<(Self, WatchStreams)> {
        config.validate()?;
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| Error::internal(format!("watcher needs a tokio runtime: {e}")))?;

        let (event_tx, events) = mpsc::channel(config.event_buffer);
        let (error_tx, errors) = mpsc::channel(config.error_buffer);
        let watch_set = Arc::new(Mutex::new(WatchSet::new()));
        let cancel = CancellationToken::new();
        let scheme = source.scheme().to_string();

        let poller = Poller {
            source,
            watch_set: Arc::clone(&watch_set),
            event_tx,
            error_tx,
            cancel: cancel.clone(),
            poll_interval: config.poll_interval,
            fetch_timeout: config.fetch_timeout,
        };
        let task = runtime.spawn(poller.run());

        let watcher = Self {
            scheme,
            watch_set,
            cancel,
            task: Some(task),
        };
        Ok((watcher, WatchStreams { events, errors }))
    }

    /// Start watching `path`.
    ///
    /// Adding a path that is already watched resets its baseline, so the
    /// next successful check reports one event for it.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is malformed or uses a scheme the
    /// fingerprint source does not serve.
    pub fn add(&self, path: &str) -> Result<WatchPath> {
        let path = WatchPath::parse(path)?;
        self.add_path(path.clone())?;
        Ok(path)
    }

    /// Start watching an already parsed path.
    ///
    /// # Errors
    ///
    /// Returns an error if the path's scheme is not served by the source.
    pub fn add_path(&self, path: WatchPath) -> Result<()> {
        if path.scheme() != self.scheme {
            return Err(WatcherError::UnsupportedScheme {
                path: path.to_string(),
                expected: self.scheme.clone(),
            }
            .into());
        }

        let label = path.to_string();
        if self.watch_set.lock().insert(path) {
            WATCHED_PATHS.inc();
            tracing::info!(path = %label, "Watching object");
        } else {
            tracing::debug!(path = %label, "Object re-added, baseline reset");
        }
        Ok(())
    }

    /// Stop watching `path`. Returns whether it was being watched.
    pub fn remove(&self, path: &str) -> bool {
        let Ok(path) = WatchPath::parse(path) else {
            return false;
        };

        let removed = self.watch_set.lock().remove(&path);
        if removed {
            WATCHED_PATHS.dec();
            tracing::info!(path = %path, "Stopped watching object");
        }
        removed
    }

    /// Currently watched paths.
    #[must_use]
    pub fn watched(&self) -> Vec<WatchPath> {
        self.watch_set.lock().paths()
    }

    /// Number of watched paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.watch_set.lock().len()
    }

    /// Check if nothing is watched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stop the polling task and wait for it to exit.
    ///
    /// Once this returns the task hands off nothing more and both streams
    /// end after their buffered items.
    ///
    /// # Errors
    ///
    /// Returns an error if the polling task panicked.
    pub async fn close(mut self) -> Result<()> {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            task.await
                .map_err(|e| WatcherError::TaskFailed(e.to_string()))?;
        }
        tracing::debug!("Watcher closed");
        Ok(())
    }
}

impl Drop for Watcher {
    fn drop(&mut self) {
        self.cancel.cancel();
        let watched = i64::try_from(self.watch_set.lock().len()).unwrap_or(i64::MAX);
        WATCHED_PATHS.sub(watched);
    }
}

/// State owned by the polling task.
struct Poller {
    source: Arc<dyn FingerprintSource>,
    watch_set: Arc<Mutex<WatchSet>>,
    event_tx: mpsc::Sender<Event>,
    error_tx: mpsc::Sender<FetchError>,
    cancel: CancellationToken,
    poll_interval: Duration,
    fetch_timeout: Option<Duration>,
}

impl Poller {
    /// Poll until cancelled. Dropping `self` closes both streams.
    async fn run(self) {
        tracing::debug!(interval = ?self.poll_interval, "Polling task started");

        loop {
            if self.poll_once().await.is_break() {
                break;
            }
            POLL_CYCLES.inc();

            tokio::select! {
                biased;
                () = self.cancel.cancelled() => break,
                () = tokio::time::sleep(self.poll_interval) => {}
            }
        }

        tracing::debug!("Polling task stopped");
    }

    /// Check every watched path once.
    async fn poll_once(&self) -> ControlFlow<()> {
        let snapshot = self.watch_set.lock().snapshot();
        tracing::trace!(paths = snapshot.len(), "Starting poll cycle");

        for snap in snapshot {
            let fetched = tokio::select! {
                biased;
                () = self.cancel.cancelled() => return ControlFlow::Break(()),
                result = self.fetch(&snap.path) => result,
            };

            let flow = match fetched {
                Ok(fingerprint) => {
                    FETCHES_TOTAL.with_label_values(&["ok"]).inc();
                    self.record(snap, fingerprint).await
                }
                Err(error) => {
                    FETCHES_TOTAL.with_label_values(&["error"]).inc();
                    tracing::warn!(path = %snap.path, error = %error, "Fingerprint fetch failed");
                    let failure = FetchError {
                        path: snap.path,
                        error,
                    };
                    self.deliver(&self.error_tx, failure).await
                }
            };

            if flow.is_break() {
                return flow;
            }
        }

        ControlFlow::Continue(())
    }

    async fn fetch(&self, path: &WatchPath) -> std::result::Result<Fingerprint, SourceError> {
        let Some(timeout) = self.fetch_timeout else {
            return self.source.fetch(path).await;
        };

        tokio::time::timeout(timeout, self.source.fetch(path))
            .await
            .unwrap_or_else(|_| {
                Err(SourceError::Timeout {
                    path: path.to_string(),
                    timeout,
                })
            })
    }

    /// Store a fetched fingerprint and report it if it is a change.
    async fn record(&self, snap: Snapshot, fingerprint: Fingerprint) -> ControlFlow<()> {
        let observation = self.watch_set.lock().observe(&snap, fingerprint);
        if observation != Observation::Changed {
            return ControlFlow::Continue(());
        }

        tracing::info!(path = %snap.path, "Object changed");
        CHANGE_EVENTS.inc();
        self.deliver(&self.event_tx, Event::new(snap.path)).await
    }

    /// Hand `value` to the consumer, giving up if shutdown wins the race.
    async fn deliver<T: Send>(&self, tx: &mpsc::Sender<T>, value: T) -> ControlFlow<()> {
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => ControlFlow::Break(()),
            sent = tx.send(value) => {
                if sent.is_err() {
                    tracing::debug!("Receiver dropped, notification discarded");
                }
                ControlFlow::Continue(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;

    fn memory_watcher(config: &WatcherConfig) -> (Watcher, WatchStreams, Arc<MemorySource>) {
        let source = Arc::new(MemorySource::new("mem"));
        let (watcher, streams) = Watcher::new(source.clone(), config).unwrap();
        (watcher, streams, source)
    }

    #[test]
    fn test_watcher_config_default() {
        let config = WatcherConfig::default();
        assert_eq!(config.poll_interval, Duration::from_secs(5));
        assert_eq!(config.event_buffer, 1);
        assert_eq!(config.fetch_timeout, Some(DEFAULT_FETCH_TIMEOUT));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_watcher_config_rejects_zero_values() {
        let cases = [
            (
                WatcherConfig {
                    poll_interval: Duration::ZERO,
                    ..Default::default()
                },
                "poll interval",
            ),
            (
                WatcherConfig {
                    event_buffer: 0,
                    ..Default::default()
                },
                "event buffer",
            ),
            (
                WatcherConfig {
                    error_buffer: 0,
                    ..Default::default()
                },
                "error buffer",
            ),
            (
                WatcherConfig {
                    fetch_timeout: Some(Duration::ZERO),
                    ..Default::default()
                },
                "fetch timeout",
            ),
        ];

        for (config, field) in cases {
            let err = config.validate().unwrap_err();
            assert!(err.to_string().contains(field), "expected '{field}' in {err}");
        }
    }

    #[test]
    fn test_watcher_requires_runtime() {
        let source = Arc::new(MemorySource::new("mem"));
        let err = Watcher::new(source, &WatcherConfig::default()).unwrap_err();
        assert!(err.to_string().contains("tokio runtime"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_add_and_remove() {
        let (watcher, _streams, _source) = memory_watcher(&WatcherConfig::default());

        let path = watcher.add("mem://bucket/key").unwrap();
        assert_eq!(path.name(), "key");
        assert_eq!(watcher.len(), 1);

        watcher.add("mem://bucket/key").unwrap();
        assert_eq!(watcher.len(), 1);

        assert!(watcher.remove("mem://bucket/key"));
        assert!(!watcher.remove("mem://bucket/key"));
        assert!(watcher.is_empty());

        watcher.close().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_add_rejects_malformed_path() {
        let (watcher, _streams, _source) = memory_watcher(&WatcherConfig::default());

        let err = watcher.add("mem://bucket").unwrap_err();
        assert!(matches!(
            err,
            Error::Watcher(WatcherError::InvalidPath { .. })
        ));
        assert!(watcher.is_empty());

        watcher.close().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_add_rejects_foreign_scheme() {
        let (watcher, _streams, _source) = memory_watcher(&WatcherConfig::default());

        let err = watcher.add("s3://bucket/key").unwrap_err();
        assert!(matches!(
            err,
            Error::Watcher(WatcherError::UnsupportedScheme { .. })
        ));
        assert!(watcher.watched().is_empty());

        watcher.close().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_remove_unknown_or_malformed_is_noop() {
        let (watcher, mut streams, _source) = memory_watcher(&WatcherConfig::default());

        assert!(!watcher.remove("mem://bucket/never-added"));
        assert!(!watcher.remove("not a path"));

        let waited =
            tokio::time::timeout(Duration::from_secs(20), streams.events.recv()).await;
        assert!(waited.is_err(), "no event expected");

        watcher.close().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_ends_streams() {
        let (watcher, mut streams, _source) = memory_watcher(&WatcherConfig::default());
        watcher.add("mem://bucket/key").unwrap();

        watcher.close().await.unwrap();

        assert!(streams.errors.recv().await.is_none());
        assert!(streams.events.recv().await.is_none());
    }
}
