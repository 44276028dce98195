use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use super::Snapshot;

/// Parsed snapshots keyed by file path, each entry expiring after `ttl`.
///
/// The caller owns the cache and decides when to [`invalidate`](Self::invalidate) it.
#[derive(Debug)]
pub struct SnapshotCache {
    ttl: Duration,
    entries: HashMap<PathBuf, (Instant, Snapshot)>,
}

impl SnapshotCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Cached snapshot for `path`, unless it has expired.
    pub fn get(&self, path: &Path) -> Option<&Snapshot> {
        self.entries
            .get(path)
            .filter(|(loaded_at, _)| loaded_at.elapsed() < self.ttl)
            .map(|(_, snapshot)| snapshot)
    }

    pub fn insert(&mut self, path: PathBuf, snapshot: Snapshot) {
        self.entries.insert(path, (Instant::now(), snapshot));
    }

    /// Drop every entry.
    pub fn invalidate(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
