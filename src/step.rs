//! `PipelineStep` — one field of filtering logic paired with its optional
//! cache prototype.
//!
//! A pipeline is an ordered sequence of steps; the order is load-bearing and
//! dictates the tree's shape. Place high-selectivity or expensive filters
//! first for the best hit rates.

use crate::{Filter, NodeCache};
use std::fmt::{self, Debug};
use std::sync::Arc;

/// An immutable pairing of a [`Filter`] with an optional [`NodeCache`]
/// prototype.
///
/// The cache value supplied here is never used directly: each tree node
/// spawns its own instance from it. A step without a cache is the no-cache
/// sentinel — that node and, by the monotonic caching rule, every node
/// below it re-evaluates on each input.
///
/// # Equality
///
/// Two steps are structurally equal when they share the same filter
/// allocation and the same cache prototype allocation (or both lack one).
/// Pipelines reject duplicates under this definition.
pub struct PipelineStep<I, O> {
    filter: Arc<dyn Filter<I, O>>,
    cache: Option<Arc<dyn NodeCache<I, O>>>,
}

impl<I, O> PipelineStep<I, O> {
    /// Create a step from a filter and an optional cache prototype.
    #[must_use]
    pub fn new(filter: Arc<dyn Filter<I, O>>, cache: Option<Arc<dyn NodeCache<I, O>>>) -> Self {
        Self { filter, cache }
    }

    /// Create a step whose node memoizes children through caches spawned
    /// from `prototype`.
    #[must_use]
    pub fn cached(filter: Arc<dyn Filter<I, O>>, prototype: Arc<dyn NodeCache<I, O>>) -> Self {
        Self {
            filter,
            cache: Some(prototype),
        }
    }

    /// Create a cacheless step: its node (and every node below it)
    /// re-evaluates on each input.
    #[must_use]
    pub fn uncached(filter: Arc<dyn Filter<I, O>>) -> Self {
        Self {
            filter,
            cache: None,
        }
    }

    /// The step's filter.
    #[must_use]
    pub fn filter(&self) -> &Arc<dyn Filter<I, O>> {
        &self.filter
    }

    /// The cache prototype, if this step is cached.
    #[must_use]
    pub fn cache_prototype(&self) -> Option<&Arc<dyn NodeCache<I, O>>> {
        self.cache.as_ref()
    }

    /// Returns `true` if this step carries a cache prototype.
    #[must_use]
    pub fn is_cached(&self) -> bool {
        self.cache.is_some()
    }
}

// Manual Clone: derive would demand I: Clone + O: Clone, but only the Arcs
// are cloned.
impl<I, O> Clone for PipelineStep<I, O> {
    fn clone(&self) -> Self {
        Self {
            filter: Arc::clone(&self.filter),
            cache: self.cache.as_ref().map(Arc::clone),
        }
    }
}

impl<I, O> PartialEq for PipelineStep<I, O> {
    fn eq(&self, other: &Self) -> bool {
        let same_filter = Arc::ptr_eq(&self.filter, &other.filter);
        let same_cache = match (&self.cache, &other.cache) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        same_filter && same_cache
    }
}

impl<I, O> Eq for PipelineStep<I, O> {}

impl<I, O> Debug for PipelineStep<I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineStep")
            .field("filter", &self.filter)
            .field("cached", &self.cache.is_some())
            .finish()
    }
}
