//! sievetree - a caching filter decision tree
//!
//! Matches a constant set of candidate outputs against a stream of inputs
//! through an ordered pipeline of filters, memoizing narrowed subtrees per
//! node so that repeated inputs converge to a handful of map lookups
//! instead of full re-evaluation.
//!
//! # Architecture
//!
//! - [`Filter<I, O>`] — per-field narrowing logic plus a cache key
//! - [`Fingerprint`] — erased, hashable lookup key (compound keys supported)
//! - [`NodeCache<I, O>`] — pluggable memoization backend; spawned per node
//!   from a prototype, with [`MapNodeCache`] as the reference
//! - [`PipelineStep<I, O>`] — one filter paired with an optional cache
//!   prototype
//! - [`TreeNode<I, O>`] — recursive node: immutable candidate frame, lazy
//!   child materialization, straight-line collapse below the last cache
//! - [`FilterTree<I, O>`] — validating façade and query entry point
//!
//! # Key Design Insights
//!
//! 1. **Prototype caches**: the cache on a step is never used directly —
//!    every node spawns its own instance, so fingerprints from different
//!    filters can never alias.
//!
//! 2. **Monotonic caching**: once one step omits its cache, all later
//!    steps must too. Validation rejects anything else, and the uncached
//!    suffix evaluates as a single straight-line pass with no node
//!    materialization.
//!
//! 3. **At-most-one durable build**: concurrent cache misses may race to
//!    build the same child; the cache's insert-if-absent `put` picks one
//!    winner, losers discard their build and proceed with it.
//!
//! # Example
//!
//! ```
//! use std::collections::HashSet;
//! use std::sync::Arc;
//!
//! use sievetree::prelude::*;
//!
//! #[derive(Debug, Clone, PartialEq, Eq, Hash)]
//! struct Route {
//!     name: &'static str,
//!     shard: i64,
//! }
//!
//! #[derive(Debug)]
//! struct Request {
//!     shard: i64,
//! }
//!
//! #[derive(Debug)]
//! struct ShardFilter;
//!
//! impl Filter<Request, Route> for ShardFilter {
//!     fn apply(&self, input: &Request, candidates: &mut HashSet<Route>) -> Result<(), BoxError> {
//!         candidates.retain(|route| route.shard == input.shard);
//!         Ok(())
//!     }
//!
//!     fn fingerprint(&self, input: &Request) -> Fingerprint {
//!         Fingerprint::Int(input.shard)
//!     }
//! }
//!
//! let tree = FilterTree::new(
//!     vec![PipelineStep::cached(Arc::new(ShardFilter), map_cache())],
//!     HashSet::from([
//!         Route { name: "primary", shard: 1 },
//!         Route { name: "replica", shard: 2 },
//!     ]),
//! )
//! .unwrap();
//!
//! // First call narrows and memoizes; the second is a pure lookup.
//! let matched = tree.matches(&Request { shard: 1 }).unwrap();
//! assert_eq!(matched.len(), 1);
//! let again = tree.matches(&Request { shard: 1 }).unwrap();
//! assert_eq!(matched, again);
//! ```
//!
//! # Config-driven construction
//!
//! Pipelines can also be compiled from JSON/YAML through a [`Registry`] of
//! type-URL-keyed filter factories; see [`RegistryBuilder`] and
//! [`PipelineConfig`].
//!
//! # Trade-offs
//!
//! The reference cache never evicts: each node's cache grows with the
//! distinct fingerprints its filter has seen. Plug a bounded [`NodeCache`]
//! implementation into the steps when keys are high-cardinality.

// ═══════════════════════════════════════════════════════════════════════════════
// Modules
// ═══════════════════════════════════════════════════════════════════════════════

mod config;
mod error;
mod filter;
mod fingerprint;
mod node;
mod node_cache;
mod registry;
mod step;
mod trace;
mod tree;

// ═══════════════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════════════

// Core types
pub use error::{BoxError, TreeError};
pub use filter::Filter;
pub use fingerprint::Fingerprint;
pub use node::TreeNode;
pub use node_cache::{map_cache, MapNodeCache, NodeCache};
pub use step::PipelineStep;
pub use tree::FilterTree;

// Config-driven construction
pub use config::{CacheChoice, PipelineConfig, StepConfig, TypedConfig, UnitConfig};
pub use registry::{IntoFilter, Registry, RegistryBuilder};

// Match tracing
pub use trace::{MatchTrace, StepTrace};

// ═══════════════════════════════════════════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════════════════════════════════════════

/// Prelude module for convenient imports.
///
/// ```
/// use sievetree::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        map_cache,
        BoxError,
        CacheChoice,
        // Traits
        Filter,
        // Core types
        FilterTree,
        Fingerprint,
        IntoFilter,
        MapNodeCache,
        MatchTrace,
        NodeCache,
        // Config-driven construction
        PipelineConfig,
        PipelineStep,
        Registry,
        RegistryBuilder,
        StepConfig,
        StepTrace,
        TreeError,
        TreeNode,
        TypedConfig,
        UnitConfig,
    };
}
