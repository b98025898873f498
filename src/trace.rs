//! Match trace types for observing a descent through the tree.
//!
//! A trace records, per depth, whether the node answered from its cache,
//! materialized a child, or collapsed into straight-line evaluation. Tracing
//! performs the same cache reads and commits as a plain match — it observes
//! the descent, it does not change it.
//!
//! ```ignore
//! let (matched, trace) = tree.matches_with_trace(&input)?;
//! println!("hits: {}, misses: {}", trace.hits(), trace.misses());
//! ```

use crate::Fingerprint;

/// What one node did while matching an input.
#[derive(Debug, Clone, PartialEq)]
pub enum StepTrace {
    /// The node's cache already held a child for the input's fingerprint.
    CacheHit {
        /// The fingerprint that was looked up.
        fingerprint: Fingerprint,
    },

    /// The node narrowed its frame and committed a new child.
    ///
    /// Under concurrency a sibling thread may win the commit; the recorded
    /// survivor count describes this thread's build, which is equal to the
    /// winner's by construction.
    CacheMiss {
        /// The fingerprint the child was stored under.
        fingerprint: Fingerprint,
        /// Candidates surviving this node's filter.
        survivors: usize,
    },

    /// An uncached node evaluated itself and every remaining step inline.
    Collapsed {
        /// Filters applied before the set emptied or the pipeline ended.
        applied: usize,
        /// Candidates surviving the straight-line narrowing.
        survivors: usize,
    },

    /// A leaf returned its frame.
    Leaf {
        /// Size of the returned frame.
        survivors: usize,
    },

    /// A non-leaf node short-circuited on an already-empty frame.
    EmptyFrame,
}

/// Flat record of a single descent, root first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchTrace {
    /// One entry per node visited.
    pub steps: Vec<StepTrace>,
}

impl MatchTrace {
    /// Create an empty trace.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, step: StepTrace) {
        self.steps.push(step);
    }

    /// Number of cache hits along the descent.
    #[must_use]
    pub fn hits(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s, StepTrace::CacheHit { .. }))
            .count()
    }

    /// Number of cache misses (child builds) along the descent.
    #[must_use]
    pub fn misses(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s, StepTrace::CacheMiss { .. }))
            .count()
    }

    /// Returns `true` if every cached node answered from its cache.
    #[must_use]
    pub fn fully_cached(&self) -> bool {
        self.misses() == 0
    }
}
