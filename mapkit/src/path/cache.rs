use dashmap::DashMap;

use crate::errors::MappingResult;
use crate::metadata::TypeRef;
use crate::path::PropertyPath;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct CacheKey {
    path: String,
    root: TypeRef,
}

impl CacheKey {
    fn new(path: &str, root: &TypeRef) -> Self {
        CacheKey {
            path: path.to_string(),
            root: root.clone(),
        }
    }
}

/// Insertion-only cache of resolved chains keyed by (path, root type).
///
/// Entries are published once: if two threads resolve the same key at the
/// same time, the first value inserted wins and both callers receive it.
/// Resolution is deterministic, so the losing computation is only wasted
/// work.
///
/// Only successful chains are cached. Failures are handed back to the
/// caller and never stored.
#[derive(Default)]
pub struct ResolutionCache {
    entries: DashMap<CacheKey, PropertyPath>,
}

impl ResolutionCache {
    pub fn new() -> Self {
        ResolutionCache {
            entries: DashMap::new(),
        }
    }

    /// Returns the cached chain for the key, resolving and publishing it on
    /// a miss. A failed resolution is returned as is.
    pub fn get_or_resolve<F>(&self, path: &str, root: &TypeRef, resolve: F) -> MappingResult<PropertyPath>
    where
        F: FnOnce() -> MappingResult<PropertyPath>,
    {
        let key = CacheKey::new(path, root);
        if let Some(entry) = self.entries.get(&key) {
            return Ok(entry.value().clone());
        }

        let path_ref = resolve()?;
        let entry = self.entries.entry(key).or_insert(path_ref);
        log::debug!("Cached resolution of '{}' on '{}'", path, root);
        Ok(entry.value().clone())
    }

    pub fn get(&self, path: &str, root: &TypeRef) -> Option<PropertyPath> {
        self.entries
            .get(&CacheKey::new(path, root))
            .map(|entry| entry.value().clone())
    }

    pub fn contains(&self, path: &str, root: &TypeRef) -> bool {
        self.entries.contains_key(&CacheKey::new(path, root))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
