//! Light-list cache store
//!
//! One [`CacheEntry`] per light-list root, keyed by the root's path. Entries
//! are created lazily, overwritten by `store`, flagged stale by `invalidate`
//! and dropped when their root goes away.

use super::LightList;
use crate::foundation::collections::OrderedSet;
use crate::scene::ScenePath;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Cached light list of one root
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Stored light paths (kept as residue after invalidation)
    pub targets: LightList,
    /// Whether readers may use `targets`; absent on reload means `false`
    #[serde(default)]
    pub valid: bool,
}

impl CacheEntry {
    /// Diagnostic state of the entry
    pub fn state(&self) -> CacheState {
        match (self.valid, self.targets.is_empty()) {
            (true, _) => CacheState::Valid,
            (false, true) => CacheState::Empty,
            (false, false) => CacheState::Stale,
        }
    }

    /// Targets if the entry may be consulted
    pub fn valid_targets(&self) -> Option<&LightList> {
        self.valid.then_some(&self.targets)
    }
}

/// Lifecycle state of a cache entry
///
/// `Empty` and `Stale` read the same way (nothing usable); they are kept
/// apart for diagnostics. An invalidated entry without residue reads as
/// `Empty`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    /// Never stored
    Empty,
    /// Stored and consultable
    Valid,
    /// Invalidated; targets are residue
    Stale,
}

/// Explicit store of light-list caches
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LightCacheStore {
    entries: BTreeMap<ScenePath, CacheEntry>,
}

impl LightCacheStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Entry for `root`, or the implicit empty/invalid entry
    pub fn get(&self, root: &ScenePath) -> CacheEntry {
        self.entries.get(root).cloned().unwrap_or_default()
    }

    /// Borrow the stored entry, if one exists
    pub fn entry(&self, root: &ScenePath) -> Option<&CacheEntry> {
        self.entries.get(root)
    }

    /// Diagnostic state of `root`'s entry
    pub fn state(&self, root: &ScenePath) -> CacheState {
        self.entries.get(root).map_or(CacheState::Empty, CacheEntry::state)
    }

    /// Replace `root`'s targets and mark them valid
    ///
    /// Last writer wins; nothing is merged with the previous contents and
    /// the list is not checked against the scene.
    pub fn store<I>(&mut self, root: &ScenePath, targets: I)
    where
        I: IntoIterator<Item = ScenePath>,
    {
        let targets: OrderedSet<ScenePath> = targets.into_iter().collect();
        log::debug!("Storing {} cached lights on {root}", targets.len());
        self.entries.insert(root.clone(), CacheEntry { targets, valid: true });
    }

    /// Mark `root`'s entry stale, keeping its targets
    pub fn invalidate(&mut self, root: &ScenePath) {
        let entry = self.entries.entry(root.clone()).or_default();
        if entry.valid {
            log::debug!("Invalidated light list cache on {root}");
        }
        entry.valid = false;
    }

    /// Put a previously persisted entry back, valid or not
    pub fn restore(&mut self, root: &ScenePath, entry: CacheEntry) {
        self.entries.insert(root.clone(), entry);
    }

    /// Destroy `root`'s entry
    pub fn remove(&mut self, root: &ScenePath) -> Option<CacheEntry> {
        self.entries.remove(root)
    }

    /// Keep only entries whose root satisfies `keep`
    pub fn retain_roots<F>(&mut self, mut keep: F)
    where
        F: FnMut(&ScenePath) -> bool,
    {
        self.entries.retain(|root, _| keep(root));
    }

    /// Roots with an entry, in path order
    pub fn roots(&self) -> impl Iterator<Item = &ScenePath> {
        self.entries.keys()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entry exists
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
