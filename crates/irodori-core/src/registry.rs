//! Quantized-color to representor mapping.
//!
//! Built incrementally during one scan run and fully cleared before the
//! next; there is deliberately no per-key removal. At most one handle
//! represents a given key at a time, so the registry never grows past
//! the pool capacity.

use std::collections::HashMap;

use crate::pool::RepresentorId;
use crate::types::ColorKey;

/// Mapping from color key to the handle currently representing it.
#[derive(Debug, Clone, Default)]
pub struct ColorRegistry {
    map: HashMap<ColorKey, RepresentorId>,
}

impl ColorRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The handle representing `key`, if the key has been seen this run.
    #[must_use]
    pub fn lookup(&self, key: ColorKey) -> Option<RepresentorId> {
        self.map.get(&key).copied()
    }

    /// Bind `key` to `id`.
    ///
    /// Inserting a key that is already present is a logic error: callers
    /// must check [`lookup`](Self::lookup) first. Enforced in debug
    /// builds; in release the stale binding is overwritten.
    pub fn insert(&mut self, key: ColorKey, id: RepresentorId) {
        let previous = self.map.insert(key, id);
        debug_assert!(previous.is_none(), "duplicate color key inserted: {key:?}");
    }

    /// Number of distinct keys bound this run.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether no keys are bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Drop every binding. The only removal operation.
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Snapshot of all bound handles, for cleanup to iterate while the
    /// registry keeps changing hands between resumes.
    #[must_use]
    pub fn ids(&self) -> Vec<RepresentorId> {
        self.map.values().copied().collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn lookup_absent_key_is_none() {
        let registry = ColorRegistry::new();
        assert_eq!(registry.lookup(ColorKey::new(1, 2, 3)), None);
    }

    #[test]
    fn insert_then_lookup() {
        let mut registry = ColorRegistry::new();
        registry.insert(ColorKey::new(1, 2, 3), RepresentorId(7));
        assert_eq!(
            registry.lookup(ColorKey::new(1, 2, 3)),
            Some(RepresentorId(7)),
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    #[should_panic(expected = "duplicate color key")]
    fn duplicate_insert_is_a_logic_error() {
        let mut registry = ColorRegistry::new();
        registry.insert(ColorKey::new(1, 1, 1), RepresentorId(0));
        registry.insert(ColorKey::new(1, 1, 1), RepresentorId(1));
    }

    #[test]
    fn clear_removes_everything() {
        let mut registry = ColorRegistry::new();
        registry.insert(ColorKey::new(0, 0, 0), RepresentorId(0));
        registry.insert(ColorKey::new(0, 0, 1), RepresentorId(1));
        registry.clear();
        assert!(registry.is_empty());
        assert_eq!(registry.lookup(ColorKey::new(0, 0, 0)), None);
    }

    #[test]
    fn ids_snapshot_covers_all_bindings() {
        let mut registry = ColorRegistry::new();
        registry.insert(ColorKey::new(0, 0, 0), RepresentorId(0));
        registry.insert(ColorKey::new(0, 0, 1), RepresentorId(1));
        let mut ids = registry.ids();
        ids.sort_by_key(|id| id.index());
        assert_eq!(ids, vec![RepresentorId(0), RepresentorId(1)]);
    }
}
