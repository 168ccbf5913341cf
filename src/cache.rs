//! Version-tracked memoization of derived values.
//!
//! Every source collection carries a version counter that is bumped when the
//! collection is replaced. A [`Memo`] declares which sources it reads and
//! stores, next to each cached value, the versions it was computed from. A
//! lookup whose snapshot no longer matches recomputes the value in full.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

/// A source collection derived values can depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    Owners,
    Standings,
    Matchups,
    Metadata,
}

impl Source {
    pub const ALL: &'static [Source] = &[
        Source::Owners,
        Source::Standings,
        Source::Matchups,
        Source::Metadata,
    ];
}

/// Current version of every source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceVersions {
    owners: u64,
    standings: u64,
    matchups: u64,
    metadata: u64,
}

impl SourceVersions {
    pub fn get(&self, source: Source) -> u64 {
        match source {
            Source::Owners => self.owners,
            Source::Standings => self.standings,
            Source::Matchups => self.matchups,
            Source::Metadata => self.metadata,
        }
    }

    /// Mark a source as changed.
    pub fn bump(&mut self, source: Source) {
        let slot = match source {
            Source::Owners => &mut self.owners,
            Source::Standings => &mut self.standings,
            Source::Matchups => &mut self.matchups,
            Source::Metadata => &mut self.metadata,
        };
        *slot += 1;
    }

    /// Versions of the given sources, in order.
    pub fn snapshot(&self, deps: &[Source]) -> Vec<u64> {
        deps.iter().map(|s| self.get(*s)).collect()
    }
}

struct Entry<V> {
    versions: Vec<u64>,
    value: Arc<V>,
}

/// Keyed cache of one kind of derived value.
pub struct Memo<K, V> {
    name: &'static str,
    deps: &'static [Source],
    entries: Mutex<HashMap<K, Entry<V>>>,
}

impl<K, V> Memo<K, V>
where
    K: Eq + Hash + Clone + Debug,
{
    pub fn new(name: &'static str, deps: &'static [Source]) -> Self {
        Self {
            name,
            deps,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Return the cached value for `key` if it was computed from the current
    /// versions of this memo's sources; otherwise compute and cache it.
    ///
    /// The cache lock is not held while `compute` runs, so computations may
    /// read other memos.
    pub fn get_or_compute<F>(&self, key: K, versions: &SourceVersions, compute: F) -> Arc<V>
    where
        F: FnOnce() -> V,
    {
        let snapshot = versions.snapshot(self.deps);

        if let Some(entry) = lock(&self.entries).get(&key) {
            if entry.versions == snapshot {
                return Arc::clone(&entry.value);
            }
        }

        debug!(memo = self.name, key = ?key, "Recomputing derived value");
        let value = Arc::new(compute());
        lock(&self.entries).insert(
            key,
            Entry {
                versions: snapshot,
                value: Arc::clone(&value),
            },
        );
        value
    }

    /// Number of cached keys, stale or not.
    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K, V> Debug for Memo<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Memo")
            .field("name", &self.name)
            .field("deps", &self.deps)
            .finish()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}
