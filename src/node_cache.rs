//! `NodeCache` — the pluggable memoization backend, plus the reference
//! in-memory implementation.
//!
//! A cache instance belongs to exactly one tree node and maps fingerprints
//! to fully materialized child subtrees. The value supplied at pipeline
//! construction is only a *prototype*: every node calls [`spawn`] to obtain
//! its own empty instance, which is what makes per-filter fingerprint
//! scoping sound — two filters may produce colliding keys, but never into
//! the same map.
//!
//! [`spawn`]: NodeCache::spawn

use crate::{Fingerprint, TreeNode};
use dashmap::DashMap;
use std::fmt::{self, Debug};
use std::sync::Arc;

/// A thread-safe mapping from [`Fingerprint`] to a materialized child node.
///
/// # Race resolution
///
/// Two threads missing the same fingerprint may both build a child and call
/// [`put`](Self::put). Implementations must guarantee that exactly one child
/// becomes durable, and must hand that survivor back so the loser can
/// discard its own build and proceed with the winner.
///
/// # Consistency
///
/// A `get` that returned a node must not later return a *different* node
/// for the same key without an intervening mutation. Eviction strategies
/// are implementation-defined; the core never evicts.
pub trait NodeCache<I, O>: Send + Sync + Debug {
    /// Produce a fresh, empty instance, independent of the receiver.
    ///
    /// Called once per node at construction; the receiver itself is never
    /// read from or written to by the tree.
    fn spawn(&self) -> Box<dyn NodeCache<I, O>>;

    /// Look up the child subtree memoized under `key`, if any.
    fn get(&self, key: &Fingerprint) -> Option<Arc<TreeNode<I, O>>>;

    /// Insert `node` under `key` and return the durable entry.
    ///
    /// On a collision the incumbent must win; the returned node is the one
    /// every caller must continue with.
    fn put(&self, key: Fingerprint, node: Arc<TreeNode<I, O>>) -> Arc<TreeNode<I, O>>;
}

/// Reference cache: an in-memory concurrent hash map.
///
/// Quick and thread safe. Carries no eviction policy — a node's cache grows
/// with the number of distinct fingerprints its filter has seen, and that
/// growth is unbounded. Deployments matching high-cardinality keys should
/// plug in a size-bounded [`NodeCache`] instead.
pub struct MapNodeCache<I, O> {
    entries: DashMap<Fingerprint, Arc<TreeNode<I, O>>>,
}

impl<I, O> MapNodeCache<I, O> {
    /// Create an empty map cache, ready to use as a prototype.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Number of memoized subtrees.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been memoized yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<I, O> Default for MapNodeCache<I, O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I, O> Debug for MapNodeCache<I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapNodeCache")
            .field("entries", &self.entries.len())
            .finish()
    }
}

impl<I, O> NodeCache<I, O> for MapNodeCache<I, O>
where
    I: 'static,
    O: Send + Sync + 'static,
{
    fn spawn(&self) -> Box<dyn NodeCache<I, O>> {
        Box::new(Self::new())
    }

    fn get(&self, key: &Fingerprint) -> Option<Arc<TreeNode<I, O>>> {
        self.entries.get(key).map(|entry| Arc::clone(entry.value()))
    }

    fn put(&self, key: Fingerprint, node: Arc<TreeNode<I, O>>) -> Arc<TreeNode<I, O>> {
        // entry() serializes racing writers per key; the first insert wins
        // and later callers get the incumbent back.
        Arc::clone(self.entries.entry(key).or_insert(node).value())
    }
}

/// Convenience factory for the reference cache, for use as a step's cache
/// prototype.
///
/// ```ignore
/// let step = PipelineStep::cached(Arc::new(RangeFilter), map_cache());
/// ```
#[must_use]
pub fn map_cache<I, O>() -> Arc<dyn NodeCache<I, O>>
where
    I: 'static,
    O: Send + Sync + 'static,
{
    Arc::new(MapNodeCache::new())
}
