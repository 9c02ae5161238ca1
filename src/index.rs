use crate::event::ContentHash;
use crate::path::ObjectPath;
use std::collections::{BTreeSet, HashMap};

/// Which live files currently hold each content hash.
///
/// Maintained from raw primitive events only, so it always reflects what
/// exists on disk regardless of how the reducer narrated it. Used for copy
/// detection.
///
/// A path holds at most one hash: recording a new hash for a path drops the
/// one it held before.
#[derive(Debug, Clone, Default)]
pub struct HashIndex {
    by_hash: HashMap<ContentHash, BTreeSet<ObjectPath>>,
    by_path: HashMap<ObjectPath, ContentHash>,
}

impl HashIndex {
    /// An empty index.
    pub fn new() -> Self {
        HashIndex::default()
    }

    /// Record that `path` now holds `hash`.
    pub fn insert(&mut self, hash: ContentHash, path: ObjectPath) {
        if let Some(old) = self.by_path.insert(path.clone(), hash.clone()) {
            if old != hash {
                self.unlink(&old, &path);
            }
        }
        self.by_hash.entry(hash).or_default().insert(path);
    }

    /// Forget that `path` holds `hash`.
    ///
    /// Returns `false`, leaving the index untouched, if `path` isn't
    /// currently recorded under `hash`.
    pub fn remove(&mut self, hash: &ContentHash, path: &ObjectPath) -> bool {
        if self.by_path.get(path) != Some(hash) {
            return false;
        }
        self.by_path.remove(path);
        self.unlink(hash, path);
        true
    }

    /// The lowest live path holding `hash`, if any.
    pub fn first(&self, hash: &ContentHash) -> Option<&ObjectPath> {
        self.by_hash.get(hash).and_then(|paths| paths.first())
    }

    /// Every live path holding `hash`, in path order.
    pub fn paths(&self, hash: &ContentHash) -> impl Iterator<Item = &ObjectPath> {
        self.by_hash.get(hash).into_iter().flatten()
    }

    /// The hash currently held by `path`.
    pub fn hash_of(&self, path: &ObjectPath) -> Option<&ContentHash> {
        self.by_path.get(path)
    }

    /// True if `path` is live under `hash`.
    pub fn contains(&self, hash: &ContentHash, path: &ObjectPath) -> bool {
        self.by_path.get(path) == Some(hash)
    }

    /// Number of live paths.
    pub fn len(&self) -> usize {
        self.by_path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_path.is_empty()
    }

    /// Every live `(path, hash)` pair, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&ObjectPath, &ContentHash)> {
        self.by_path.iter()
    }

    fn unlink(&mut self, hash: &ContentHash, path: &ObjectPath) {
        if let Some(paths) = self.by_hash.get_mut(hash) {
            paths.remove(path);
            if paths.is_empty() {
                self.by_hash.remove(hash);
            }
        }
    }
}
