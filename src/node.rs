//! `TreeNode` — a branch at a fixed depth, narrowing and memoizing child
//! subtrees for one filter.
//!
//! Each node owns the immutable candidate frame it inherited from its
//! parent, the filter for its depth, and (when the step was cached) a
//! private cache instance mapping fingerprints to materialized children.
//! Nodes are created by the root's constructor or lazily by a parent on a
//! cache miss, and never mutate after construction — the cache's contents
//! are the only shared mutable state, and the cache implementation owns
//! that race.

use crate::{BoxError, Filter, MatchTrace, NodeCache, PipelineStep, StepTrace, TreeError};
use std::collections::HashSet;
use std::fmt::{self, Debug};
use std::hash::Hash;
use std::sync::Arc;

/// The three shapes a node can take, fixed at construction.
enum NodeKind<I, O> {
    /// Remaining pipeline was empty: the frame is the answer.
    Leaf,

    /// Filter plus a cache spawned from the step's prototype; children are
    /// memoized per fingerprint.
    Cached {
        filter: Arc<dyn Filter<I, O>>,
        cache: Box<dyn NodeCache<I, O>>,
    },

    /// Filter without a cache; this node and everything below it evaluate
    /// inline on every input.
    Uncached { filter: Arc<dyn Filter<I, O>> },
}

/// A node of the filter tree.
///
/// Users only meet this type through the [`NodeCache`] contract, which
/// stores and retrieves `Arc<TreeNode>` values; construction and traversal
/// belong to the tree.
pub struct TreeNode<I, O> {
    frame: Arc<HashSet<O>>,
    kind: NodeKind<I, O>,
    tail: Vec<PipelineStep<I, O>>,
}

impl<I, O> TreeNode<I, O>
where
    O: Clone + Eq + Hash,
{
    /// Build a node from the remaining pipeline and the frame inherited
    /// from the parent.
    ///
    /// The first step becomes this node's filter (spawning a private cache
    /// instance from its prototype if it has one); the rest is retained for
    /// descendants. An empty `steps` makes a leaf.
    pub(crate) fn new(mut steps: Vec<PipelineStep<I, O>>, frame: HashSet<O>) -> Self {
        let kind = if steps.is_empty() {
            NodeKind::Leaf
        } else {
            let head = steps.remove(0);
            let filter = Arc::clone(head.filter());
            match head.cache_prototype() {
                Some(prototype) => NodeKind::Cached {
                    filter,
                    cache: prototype.spawn(),
                },
                None => NodeKind::Uncached { filter },
            }
        };

        Self {
            frame: Arc::new(frame),
            kind,
            tail: steps,
        }
    }

    /// The candidates still alive at this depth.
    #[must_use]
    pub fn frame(&self) -> &HashSet<O> {
        &self.frame
    }

    /// Returns `true` if this node was constructed with an empty remaining
    /// pipeline.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf)
    }

    /// Match `input` against the subtree rooted here.
    ///
    /// # Errors
    ///
    /// [`TreeError::MissingFingerprint`] when a cached filter returns no
    /// fingerprint, [`TreeError::FilterFailed`] when a filter's `apply`
    /// fails. A failed build commits nothing to any cache.
    pub fn matches(&self, input: &I) -> Result<Arc<HashSet<O>>, TreeError> {
        self.matches_inner(input, None)
    }

    pub(crate) fn matches_inner(
        &self,
        input: &I,
        mut trace: Option<&mut MatchTrace>,
    ) -> Result<Arc<HashSet<O>>, TreeError> {
        // The empty frame is terminal: narrowing cannot resurrect
        // candidates, so stop descending.
        if self.frame.is_empty() && !self.is_leaf() {
            if let Some(t) = trace.as_mut() {
                t.record(StepTrace::EmptyFrame);
            }
            return Ok(Arc::clone(&self.frame));
        }

        match &self.kind {
            NodeKind::Leaf => {
                if let Some(t) = trace.as_mut() {
                    t.record(StepTrace::Leaf {
                        survivors: self.frame.len(),
                    });
                }
                Ok(Arc::clone(&self.frame))
            }

            NodeKind::Cached { filter, cache } => {
                let key = filter.fingerprint(input);
                if key.is_none() {
                    return Err(TreeError::MissingFingerprint {
                        filter: format!("{filter:?}"),
                    });
                }

                if let Some(child) = cache.get(&key) {
                    if let Some(t) = trace.as_mut() {
                        t.record(StepTrace::CacheHit { fingerprint: key });
                    }
                    return child.matches_inner(input, trace);
                }

                let mut working = self.frame.as_ref().clone();
                filter
                    .apply(input, &mut working)
                    .map_err(|source| filter_failed(filter, source))?;

                if let Some(t) = trace.as_mut() {
                    t.record(StepTrace::CacheMiss {
                        fingerprint: key.clone(),
                        survivors: working.len(),
                    });
                }
                tracing::trace!(
                    fingerprint = ?key,
                    survivors = working.len(),
                    "materializing child node"
                );

                let built = Arc::new(TreeNode::new(self.tail.clone(), working));
                // A racing builder may have committed first; the cache hands
                // back the durable child and the local build is dropped.
                let child = cache.put(key, built);
                child.matches_inner(input, trace)
            }

            NodeKind::Uncached { filter } => {
                // Nothing below this node is cached (monotonic caching
                // rule), so materializing children buys nothing: narrow
                // straight through the remaining steps instead.
                let mut working = self.frame.as_ref().clone();
                filter
                    .apply(input, &mut working)
                    .map_err(|source| filter_failed(filter, source))?;
                let mut applied = 1;

                for step in &self.tail {
                    if working.is_empty() {
                        break;
                    }
                    step.filter()
                        .apply(input, &mut working)
                        .map_err(|source| filter_failed(step.filter(), source))?;
                    applied += 1;
                }

                if let Some(t) = trace.as_mut() {
                    t.record(StepTrace::Collapsed {
                        applied,
                        survivors: working.len(),
                    });
                }
                Ok(Arc::new(working))
            }
        }
    }
}

fn filter_failed<I, O>(filter: &Arc<dyn Filter<I, O>>, source: BoxError) -> TreeError {
    TreeError::FilterFailed {
        filter: format!("{filter:?}"),
        source,
    }
}

impl<I, O> Debug for TreeNode<I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.kind {
            NodeKind::Leaf => "Leaf",
            NodeKind::Cached { .. } => "CachedBranch",
            NodeKind::Uncached { .. } => "UncachedBranch",
        };
        f.debug_struct("TreeNode")
            .field("kind", &kind)
            .field("frame", &self.frame.len())
            .field("tail", &self.tail.len())
            .finish()
    }
}
