//! Weak-keyed side table for per-node state.
//!
//! Entries are keyed by node identity and hold only a `WeakNode`, so the
//! table never keeps a node alive. Entries whose node has been dropped are
//! purged lazily: explicitly via `purge()`, and automatically when the table
//! grows past twice its size after the previous purge.

use rustc_hash::FxHashMap;

use crate::node::{Node, NodeKey, WeakNode};

/// Table size below which no automatic purge is attempted
const MIN_PURGE_THRESHOLD: usize = 64;

#[derive(Debug)]
struct Entry<V> {
    node: WeakNode,
    value: V,
}

/// Map from node identity to `V` that does not own its keys
#[derive(Debug)]
pub struct WeakKeyMap<V> {
    entries: FxHashMap<NodeKey, Entry<V>>,
    purge_at: usize,
}

impl<V> Default for WeakKeyMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> WeakKeyMap<V> {
    /// Create an empty table
    pub fn new() -> Self {
        Self {
            entries: FxHashMap::default(),
            purge_at: MIN_PURGE_THRESHOLD,
        }
    }

    // A stored `WeakNode` keeps the allocation (not the node) alive, so a key
    // cannot be reused by another node while its entry exists.

    pub fn get(&self, node: &Node) -> Option<&V> {
        self.entries.get(&node.key()).map(|e| &e.value)
    }

    pub fn get_mut(&mut self, node: &Node) -> Option<&mut V> {
        self.entries.get_mut(&node.key()).map(|e| &mut e.value)
    }

    pub fn contains(&self, node: &Node) -> bool {
        self.entries.contains_key(&node.key())
    }

    /// Get the entry for `node`, inserting `init()` if absent
    pub fn get_or_insert_with(&mut self, node: &Node, init: impl FnOnce() -> V) -> &mut V {
        let key = node.key();
        if !self.entries.contains_key(&key) && self.entries.len() >= self.purge_at {
            self.purge();
        }
        &mut self
            .entries
            .entry(key)
            .or_insert_with(|| Entry {
                node: node.downgrade(),
                value: init(),
            })
            .value
    }

    pub fn remove(&mut self, node: &Node) -> Option<V> {
        self.entries.remove(&node.key()).map(|e| e.value)
    }

    /// Drop entries whose node no longer exists. Returns how many were dropped.
    pub fn purge(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, e| !e.node.is_dead());
        let purged = before - self.entries.len();
        self.purge_at = (self.entries.len() * 2).max(MIN_PURGE_THRESHOLD);
        purged
    }

    /// Number of stored entries, including dead ones not yet purged
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries whose node is still alive
    pub fn live_len(&self) -> usize {
        self.entries.values().filter(|e| !e.node.is_dead()).count()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.purge_at = MIN_PURGE_THRESHOLD;
    }
}

// =============================================================================
// Tests
// =============================================================================
