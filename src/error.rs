//! Error types surfaced at tree construction and match time.
//!
//! Configuration errors ([`TreeError::EmptyPipeline`] through
//! [`TreeError::CacheAfterUncached`]) are raised synchronously by
//! [`FilterTree::new`](crate::FilterTree::new). The remaining variants
//! surface from [`matches`](crate::FilterTree::matches) or from the
//! config-loading registry.

use thiserror::Error;

/// Boxed error type carried by failing [`Filter`](crate::Filter)
/// implementations.
///
/// User filters report failures as any `Error + Send + Sync`; the tree wraps
/// them in [`TreeError::FilterFailed`] before surfacing them to the caller.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors produced by the filter tree.
#[derive(Debug, Error)]
pub enum TreeError {
    /// The pipeline contained no steps.
    #[error("pipeline must contain at least one step")]
    EmptyPipeline,

    /// The candidate set contained no entries.
    #[error("candidate set must contain at least one entry")]
    EmptyCandidates,

    /// Two pipeline steps were structurally equal.
    #[error("pipeline steps must be distinct (step {index} repeats an earlier step)")]
    DuplicateStep {
        /// Index of the repeating step.
        index: usize,
    },

    /// A cache-bearing step followed a cacheless step.
    ///
    /// Once a step omits its cache, every later step must omit it too —
    /// otherwise the uncached stretch would re-evaluate on every input while
    /// its descendants memoize stale subtrees.
    #[error("step {index} has a cache but follows an uncached step")]
    CacheAfterUncached {
        /// Index of the offending cached step.
        index: usize,
    },

    /// A filter returned [`Fingerprint::None`](crate::Fingerprint::None)
    /// where a fingerprint is required for a cache lookup.
    #[error("filter {filter} returned no fingerprint for the input")]
    MissingFingerprint {
        /// Debug rendering of the offending filter.
        filter: String,
    },

    /// A filter's `apply` failed while narrowing a candidate set.
    ///
    /// No cache entry is committed for the failed build; the tree stays
    /// consistent and the next call re-attempts the narrowing.
    #[error("filter {filter} failed")]
    FilterFailed {
        /// Debug rendering of the offending filter.
        filter: String,
        /// The underlying filter error.
        #[source]
        source: BoxError,
    },

    /// A config step referenced a type URL with no registered factory.
    #[error("no filter registered for type url `{type_url}`")]
    UnknownTypeUrl {
        /// The unresolved type URL.
        type_url: String,
    },

    /// A filter config payload failed to deserialize or was semantically
    /// invalid.
    #[error("invalid filter config: {reason}")]
    InvalidConfig {
        /// What went wrong.
        reason: String,
    },
}
