use std::collections::{BTreeMap, BTreeSet};

/// Registries of the per-frame cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CacheKind {
    Textures,
    Materials,
    Displace,
    Proxy,
    Bitmap,
    UvwGen,
    Toon,
}

/// Names already written in the current frame, per [`CacheKind`].
///
/// Reset at every frame start. Writers call [`FrameCache::mark`] before emitting a record and
/// only emit when it returns `true`.
#[derive(Clone, Debug, Default)]
pub struct FrameCache {
    seen: BTreeMap<CacheKind, BTreeSet<String>>,
}

impl FrameCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seen(&self, kind: CacheKind, name: &str) -> bool {
        self.seen.get(&kind).is_some_and(|s| s.contains(name))
    }

    /// Record `name`; `true` when it was not present yet.
    pub fn mark(&mut self, kind: CacheKind, name: &str) -> bool {
        let set = self.seen.entry(kind).or_default();
        if set.contains(name) {
            return false;
        }
        set.insert(name.to_string())
    }

    pub fn reset(&mut self) {
        self.seen.clear();
    }

    pub fn len(&self, kind: CacheKind) -> usize {
        self.seen.get(&kind).map_or(0, BTreeSet::len)
    }

    pub fn is_empty(&self) -> bool {
        self.seen.values().all(BTreeSet::is_empty)
    }
}
