//! Type registry for config-driven pipeline construction.
//!
//! The registry turns a serde [`PipelineConfig`] into a compiled
//! [`FilterTree`] without domain-specific loading code. Each filter type
//! registers itself under a type URL via [`IntoFilter`]; at registration
//! time the concrete type is monomorphized into a closure and erased behind
//! `Box<dyn Fn>` — early type erasure at registration, late invocation at
//! load time.
//!
//! # Example
//!
//! ```ignore
//! let registry = RegistryBuilder::new()
//!     .filter::<RangeFilter>("demo.Range")
//!     .filter::<TokenFilter>("demo.Token")
//!     .build();
//!
//! let config: PipelineConfig = serde_json::from_str(json)?;
//! let tree = registry.load_tree(config, candidates)?;
//! ```

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::{
    map_cache, CacheChoice, Filter, FilterTree, PipelineConfig, PipelineStep, StepConfig,
    TreeError,
};

/// Trait for filters constructible from configuration.
///
/// Each filter type knows its own config shape via the associated `Config`
/// type; the registry deserializes the step's payload as that type and
/// calls [`from_config`](Self::from_config) at load time.
pub trait IntoFilter<I: 'static, O: 'static>: Send + Sync + 'static {
    /// The configuration type deserialized from the step's JSON payload.
    type Config: DeserializeOwned + Send + Sync;

    /// Construct a filter from deserialized configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidConfig`] if the payload is semantically
    /// invalid (e.g. an empty field name).
    fn from_config(config: Self::Config) -> Result<Arc<dyn Filter<I, O>>, TreeError>;
}

/// Type-erased factory closure: JSON payload in, constructed filter out.
type BoxedFactory<I, O> =
    Box<dyn Fn(&serde_json::Value) -> Result<Arc<dyn Filter<I, O>>, TreeError> + Send + Sync>;

/// Builder for a [`Registry`].
///
/// Register filter types with their type URLs, then [`build()`](Self::build)
/// an immutable registry. No runtime registration is possible after that.
pub struct RegistryBuilder<I, O> {
    factories: HashMap<String, BoxedFactory<I, O>>,
}

impl<I: 'static, O: 'static> RegistryBuilder<I, O> {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register a filter type under `type_url`.
    ///
    /// The concrete type `T` is erased here: load time only sees a closure
    /// that deserializes `T::Config` and defers to `T::from_config`.
    #[must_use]
    pub fn filter<T: IntoFilter<I, O>>(mut self, type_url: &str) -> Self {
        self.factories.insert(
            type_url.to_owned(),
            Box::new(|value: &serde_json::Value| {
                let config: T::Config = serde_json::from_value(value.clone()).map_err(|e| {
                    TreeError::InvalidConfig {
                        reason: e.to_string(),
                    }
                })?;
                T::from_config(config)
            }),
        );
        self
    }

    /// Freeze the registry.
    #[must_use]
    pub fn build(self) -> Registry<I, O> {
        Registry {
            factories: self.factories,
        }
    }
}

impl<I: 'static, O: 'static> Default for RegistryBuilder<I, O> {
    fn default() -> Self {
        Self::new()
    }
}

/// Immutable registry of filter factories, keyed by type URL.
pub struct Registry<I, O> {
    factories: HashMap<String, BoxedFactory<I, O>>,
}

impl<I, O> Registry<I, O>
where
    I: 'static,
    O: Clone + Eq + Hash + Send + Sync + 'static,
{
    /// Compile a pipeline from configuration.
    ///
    /// # Errors
    ///
    /// - [`TreeError::UnknownTypeUrl`] — a step's `type_url` is not
    ///   registered
    /// - [`TreeError::InvalidConfig`] — a payload failed to deserialize or
    ///   a factory rejected it
    pub fn load_pipeline(
        &self,
        config: PipelineConfig,
    ) -> Result<Vec<PipelineStep<I, O>>, TreeError> {
        config
            .steps
            .into_iter()
            .map(|step| self.load_step(step))
            .collect()
    }

    /// Compile a pipeline and build a [`FilterTree`] over `candidates`.
    ///
    /// # Errors
    ///
    /// As for [`load_pipeline`](Self::load_pipeline), plus every
    /// construction error of [`FilterTree::new`].
    pub fn load_tree(
        &self,
        config: PipelineConfig,
        candidates: std::collections::HashSet<O>,
    ) -> Result<FilterTree<I, O>, TreeError> {
        let pipeline = self.load_pipeline(config)?;
        FilterTree::new(pipeline, candidates)
    }

    /// Number of registered filter types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Returns `true` if no filter types are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Returns `true` if `type_url` is registered.
    #[must_use]
    pub fn contains(&self, type_url: &str) -> bool {
        self.factories.contains_key(type_url)
    }

    fn load_step(&self, config: StepConfig) -> Result<PipelineStep<I, O>, TreeError> {
        let factory = self.factories.get(&config.filter.type_url).ok_or_else(|| {
            TreeError::UnknownTypeUrl {
                type_url: config.filter.type_url.clone(),
            }
        })?;
        let filter = factory(&config.filter.config)?;

        Ok(match config.cache {
            CacheChoice::Map => PipelineStep::cached(filter, map_cache()),
            CacheChoice::None => PipelineStep::uncached(filter),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BoxError, Fingerprint, UnitConfig};
    use std::collections::HashSet;

    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    struct Plan {
        name: &'static str,
        seats: i64,
    }

    #[derive(Debug)]
    struct Signup {
        seats: i64,
    }

    #[derive(Debug)]
    struct SeatFilter {
        strict: bool,
    }

    impl Filter<Signup, Plan> for SeatFilter {
        fn apply(&self, input: &Signup, candidates: &mut HashSet<Plan>) -> Result<(), BoxError> {
            if self.strict {
                candidates.retain(|plan| plan.seats == input.seats);
            } else {
                candidates.retain(|plan| plan.seats >= input.seats);
            }
            Ok(())
        }

        fn fingerprint(&self, input: &Signup) -> Fingerprint {
            Fingerprint::Int(input.seats)
        }
    }

    #[derive(serde::Deserialize)]
    struct SeatFilterConfig {
        #[serde(default)]
        strict: bool,
    }

    impl IntoFilter<Signup, Plan> for SeatFilter {
        type Config = SeatFilterConfig;

        fn from_config(config: Self::Config) -> Result<Arc<dyn Filter<Signup, Plan>>, TreeError> {
            Ok(Arc::new(SeatFilter {
                strict: config.strict,
            }))
        }
    }

    #[derive(Debug)]
    struct KeepAllFilter;

    impl Filter<Signup, Plan> for KeepAllFilter {
        fn apply(&self, _input: &Signup, _candidates: &mut HashSet<Plan>) -> Result<(), BoxError> {
            Ok(())
        }

        fn fingerprint(&self, _input: &Signup) -> Fingerprint {
            Fingerprint::Bool(true)
        }
    }

    impl IntoFilter<Signup, Plan> for KeepAllFilter {
        type Config = UnitConfig;

        fn from_config(_config: Self::Config) -> Result<Arc<dyn Filter<Signup, Plan>>, TreeError> {
            Ok(Arc::new(KeepAllFilter))
        }
    }

    fn plans() -> HashSet<Plan> {
        HashSet::from([
            Plan { name: "solo", seats: 1 },
            Plan { name: "team", seats: 10 },
        ])
    }

    #[test]
    fn builder_registers_and_freezes() {
        let registry = RegistryBuilder::<Signup, Plan>::new()
            .filter::<SeatFilter>("demo.Seats")
            .build();

        assert_eq!(registry.len(), 1);
        assert!(registry.contains("demo.Seats"));
        assert!(!registry.contains("demo.Unknown"));
    }

    #[test]
    fn load_tree_from_json() {
        let registry = RegistryBuilder::<Signup, Plan>::new()
            .filter::<SeatFilter>("demo.Seats")
            .filter::<KeepAllFilter>("demo.KeepAll")
            .build();

        let json = serde_json::json!({
            "steps": [
                { "filter": { "type_url": "demo.Seats", "config": { "strict": false } }, "cache": "map" },
                { "filter": { "type_url": "demo.KeepAll" } }
            ]
        });

        let config: PipelineConfig = serde_json::from_value(json).unwrap();
        let tree = registry.load_tree(config, plans()).unwrap();
        assert_eq!(tree.depth(), 2);

        let matched = tree.matches(&Signup { seats: 5 }).unwrap();
        assert_eq!(matched.len(), 1);
        assert!(matched.contains(&Plan { name: "team", seats: 10 }));
    }

    #[test]
    fn unknown_type_url_is_an_error() {
        let registry = RegistryBuilder::<Signup, Plan>::new().build();

        let json = serde_json::json!({
            "steps": [{ "filter": { "type_url": "demo.Missing" } }]
        });
        let config: PipelineConfig = serde_json::from_value(json).unwrap();

        let err = registry.load_pipeline(config).unwrap_err();
        assert!(matches!(err, TreeError::UnknownTypeUrl { .. }));
    }

    #[test]
    fn malformed_payload_is_an_error() {
        let registry = RegistryBuilder::<Signup, Plan>::new()
            .filter::<SeatFilter>("demo.Seats")
            .build();

        let json = serde_json::json!({
            "steps": [{ "filter": { "type_url": "demo.Seats", "config": { "strict": "yes" } } }]
        });
        let config: PipelineConfig = serde_json::from_value(json).unwrap();

        let err = registry.load_pipeline(config).unwrap_err();
        assert!(matches!(err, TreeError::InvalidConfig { .. }));
    }

    #[test]
    fn loaded_pipeline_still_validates() {
        // cache: map after cache: none must fail at tree construction.
        let registry = RegistryBuilder::<Signup, Plan>::new()
            .filter::<SeatFilter>("demo.Seats")
            .filter::<KeepAllFilter>("demo.KeepAll")
            .build();

        let json = serde_json::json!({
            "steps": [
                { "filter": { "type_url": "demo.KeepAll" }, "cache": "none" },
                { "filter": { "type_url": "demo.Seats" }, "cache": "map" }
            ]
        });
        let config: PipelineConfig = serde_json::from_value(json).unwrap();

        let err = registry.load_tree(config, plans()).unwrap_err();
        assert!(matches!(err, TreeError::CacheAfterUncached { index: 1 }));
    }

    #[test]
    fn registry_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Registry<Signup, Plan>>();
    }
}
