//! `Filter` — per-node matching logic over a candidate set.
//!
//! A filter represents one field of decision logic: where hand-written rules
//! would say `if input.leg_count() > 4 && ..`, the leg-count branch becomes a
//! filter. Filters narrow a candidate set in place and, when the owning node
//! is cached, produce the [`Fingerprint`] that memoizes the narrowed subtree
//! for every later input with the same key.

use crate::{BoxError, Fingerprint};
use std::collections::HashSet;
use std::fmt::Debug;

/// Narrows a candidate set for one node of the tree.
///
/// # Type Parameters
///
/// - `I`: the input (request) type matched against
/// - `O`: the candidate (output) type being narrowed
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; many threads evaluate the same
/// tree concurrently on their own stacks.
///
/// # Example
///
/// ```ignore
/// #[derive(Debug)]
/// struct LegCountFilter;
///
/// impl Filter<Animal, Species> for LegCountFilter {
///     fn apply(&self, input: &Animal, candidates: &mut HashSet<Species>) -> Result<(), BoxError> {
///         candidates.retain(|s| s.leg_count == input.leg_count);
///         Ok(())
///     }
///
///     fn fingerprint(&self, input: &Animal) -> Fingerprint {
///         Fingerprint::Int(input.leg_count)
///     }
/// }
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `Filter<{I}, {O}>`",
    label = "this type cannot narrow a set of `{O}` for a `{I}` input",
    note = "Filter<I, O> is implemented per input/candidate pair; check that both type parameters match the tree you are building"
)]
pub trait Filter<I, O>: Send + Sync + Debug {
    /// Narrow `candidates` in place, removing every candidate that does not
    /// satisfy this filter for `input`.
    ///
    /// The set handed in is a private working copy; implementations may
    /// remove freely and must not assume anything about iteration order.
    ///
    /// # Errors
    ///
    /// A failure surfaces from [`matches`](crate::FilterTree::matches) as
    /// [`TreeError::FilterFailed`](crate::TreeError::FilterFailed); the tree
    /// commits no cache entry for the aborted build.
    fn apply(&self, input: &I, candidates: &mut HashSet<O>) -> Result<(), BoxError>;

    /// Produce the cache key representing this filter's view of `input`.
    ///
    /// Must not return [`Fingerprint::None`] — a cached node treats an
    /// absent key as fatal. When several input fields participate, return a
    /// [`Fingerprint::Compound`] so the whole combination costs one lookup.
    ///
    /// Only consulted when the owning step carries a cache; uncached steps
    /// never ask for a fingerprint.
    fn fingerprint(&self, input: &I) -> Fingerprint;
}

// Blanket implementation for boxed filters
#[diagnostic::do_not_recommend]
impl<I, O> Filter<I, O> for Box<dyn Filter<I, O>> {
    fn apply(&self, input: &I, candidates: &mut HashSet<O>) -> Result<(), BoxError> {
        (**self).apply(input, candidates)
    }

    fn fingerprint(&self, input: &I) -> Fingerprint {
        (**self).fingerprint(input)
    }
}
