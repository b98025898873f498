//! `FilterTree` — the user-facing façade: pipeline validation plus match
//! delegation.
//!
//! A tree matches a constant set of possible outputs against a stream of
//! inputs, where each input would otherwise run a pile of hand-written
//! if/then logic. Cached steps reduce re-evaluation of thousands of
//! candidates to one map lookup per field; uncached steps re-evaluate on
//! every call.

use crate::{MatchTrace, PipelineStep, TreeError, TreeNode};
use std::collections::HashSet;
use std::fmt::{self, Debug};
use std::hash::Hash;
use std::sync::Arc;

/// A caching decision tree over a fixed candidate set.
///
/// # Construction
///
/// [`new`](Self::new) validates the pipeline before building anything:
/// non-empty pipeline, non-empty candidates, pairwise-distinct steps, and
/// the monotonic caching rule — once a step omits its cache, every later
/// step must omit it too. A fully-uncached pipeline is valid and evaluates
/// as one straight-line pass per input.
///
/// # Querying
///
/// [`matches`](Self::matches) returns the surviving candidates as a shared
/// read-only set; it is empty when nothing survives. Any number of threads
/// may call it concurrently — for a given input, every call returns an
/// equal set, with no guarantees about element order.
pub struct FilterTree<I, O> {
    root: TreeNode<I, O>,
    depth: usize,
}

impl<I, O> FilterTree<I, O>
where
    O: Clone + Eq + Hash,
{
    /// Build a tree from an ordered pipeline and the constant candidate
    /// set.
    ///
    /// Step order is load-bearing: it dictates the tree's shape and cache
    /// locality. Put high-selectivity or expensive filters first.
    ///
    /// # Errors
    ///
    /// - [`TreeError::EmptyPipeline`] / [`TreeError::EmptyCandidates`]
    /// - [`TreeError::DuplicateStep`] when two steps are structurally equal
    /// - [`TreeError::CacheAfterUncached`] when a cached step follows an
    ///   uncached one
    pub fn new(
        pipeline: Vec<PipelineStep<I, O>>,
        candidates: HashSet<O>,
    ) -> Result<Self, TreeError> {
        if pipeline.is_empty() {
            return Err(TreeError::EmptyPipeline);
        }
        if candidates.is_empty() {
            return Err(TreeError::EmptyCandidates);
        }

        for (index, step) in pipeline.iter().enumerate() {
            if pipeline[..index].contains(step) {
                return Err(TreeError::DuplicateStep { index });
            }
        }

        // Monotonic caching rule: a cached node below an uncached one could
        // never be reached through a memoized path, so reject the shape
        // outright.
        let mut caching = true;
        for (index, step) in pipeline.iter().enumerate() {
            if step.is_cached() {
                if !caching {
                    return Err(TreeError::CacheAfterUncached { index });
                }
            } else {
                caching = false;
            }
        }

        let depth = pipeline.len();
        tracing::debug!(
            steps = depth,
            cached_steps = pipeline.iter().filter(|s| s.is_cached()).count(),
            candidates = candidates.len(),
            "filter tree constructed"
        );

        Ok(Self {
            root: TreeNode::new(pipeline, candidates),
            depth,
        })
    }

    /// Match `input` against the candidate set.
    ///
    /// The returned set is shared and read-only; callers needing an owned
    /// copy should clone it.
    ///
    /// # Errors
    ///
    /// [`TreeError::MissingFingerprint`] and [`TreeError::FilterFailed`]
    /// surface from filters; the tree itself stays consistent across a
    /// failure.
    pub fn matches(&self, input: &I) -> Result<Arc<HashSet<O>>, TreeError> {
        self.root.matches(input)
    }

    /// Match `input` and record what each visited node did.
    ///
    /// Same semantics as [`matches`](Self::matches) — the trace observes
    /// cache behavior, it does not alter it.
    ///
    /// # Errors
    ///
    /// As for [`matches`](Self::matches).
    pub fn matches_with_trace(
        &self,
        input: &I,
    ) -> Result<(Arc<HashSet<O>>, MatchTrace), TreeError> {
        let mut trace = MatchTrace::new();
        let matched = self.root.matches_inner(input, Some(&mut trace))?;
        Ok((matched, trace))
    }

    /// Number of pipeline steps the tree was built from.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The full candidate set the tree was built over.
    #[must_use]
    pub fn candidates(&self) -> &HashSet<O> {
        self.root.frame()
    }
}

impl<I, O> Debug for FilterTree<I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterTree")
            .field("depth", &self.depth)
            .field("root", &self.root)
            .finish()
    }
}
