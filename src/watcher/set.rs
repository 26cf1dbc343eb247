//! Watched paths and their last-seen fingerprints.

use std::collections::BTreeMap;

use super::path::WatchPath;
use crate::source::Fingerprint;

/// What the watcher knows about a path's fingerprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Baseline {
    /// Freshly added; the first successful fetch is recorded silently.
    Pending,
    /// Re-added while watched; the next successful fetch always reports.
    Reset,
    /// Last fingerprint observed.
    Known(Fingerprint),
}

#[derive(Debug, Clone)]
struct WatchEntry {
    baseline: Baseline,
    generation: u64,
}

/// A path and its state as read at the start of a poll cycle.
#[derive(Debug, Clone)]
pub(crate) struct Snapshot {
    pub path: WatchPath,
    pub generation: u64,
}

/// Outcome of recording a fetched fingerprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Observation {
    /// Fingerprint differs from the baseline, or the baseline was reset.
    Changed,
    /// Fingerprint matches, or this was the first silent baseline.
    Unchanged,
    /// The path was removed or re-added since the snapshot.
    Stale,
}

/// Map from watch path to entry.
///
/// The polling task only updates baselines of existing keys; keys come and
/// go through `insert` and `remove` alone.
#[derive(Debug, Default)]
pub(crate) struct WatchSet {
    entries: BTreeMap<WatchPath, WatchEntry>,
    next_generation: u64,
}

impl WatchSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `path`, or reset its baseline if it is already watched.
    ///
    /// Returns `true` if the path was newly added.
    pub fn insert(&mut self, path: WatchPath) -> bool {
        self.next_generation += 1;
        let generation = self.next_generation;

        if let Some(entry) = self.entries.get_mut(&path) {
            entry.baseline = Baseline::Reset;
            entry.generation = generation;
            false
        } else {
            self.entries.insert(
                path,
                WatchEntry {
                    baseline: Baseline::Pending,
                    generation,
                },
            );
            true
        }
    }

    pub fn remove(&mut self, path: &WatchPath) -> bool {
        self.entries.remove(path).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn paths(&self) -> Vec<WatchPath> {
        self.entries.keys().cloned().collect()
    }

    pub fn snapshot(&self) -> Vec<Snapshot> {
        self.entries
            .iter()
            .map(|(path, entry)| Snapshot {
                path: path.clone(),
                generation: entry.generation,
            })
            .collect()
    }

    /// Compare `fingerprint` with the stored baseline and store it.
    pub fn observe(&mut self, snap: &Snapshot, fingerprint: Fingerprint) -> Observation {
        let Some(entry) = self.entries.get_mut(&snap.path) else {
            return Observation::Stale;
        };
        if entry.generation != snap.generation {
            return Observation::Stale;
        }

        let observation = match &entry.baseline {
            Baseline::Pending => Observation::Unchanged,
            Baseline::Reset => Observation::Changed,
            Baseline::Known(last) if *last == fingerprint => return Observation::Unchanged,
            Baseline::Known(_) => Observation::Changed,
        };
        entry.baseline = Baseline::Known(fingerprint);
        observation
    }

    #[cfg(test)]
    pub fn baseline(&self, path: &WatchPath) -> Option<&Baseline> {
        self.entries.get(path).map(|e| &e.baseline)
    }
}
