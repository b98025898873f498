//! Config types for building pipelines from JSON/YAML.
//!
//! These types mirror the runtime pipeline but are serde-deserializable,
//! enabling config-driven construction through
//! [`Registry::load_pipeline()`](crate::Registry::load_pipeline). Filters
//! are resolved by `type_url` against a registry of factories; candidates
//! are opaque values and always arrive through code.

use serde::Deserialize;

/// Configuration for a whole pipeline.
///
/// ```json
/// {
///   "steps": [
///     { "filter": { "type_url": "demo.Range" }, "cache": "map" },
///     { "filter": { "type_url": "demo.Token" } }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Steps in evaluation order.
    pub steps: Vec<StepConfig>,
}

/// Configuration for one pipeline step.
#[derive(Debug, Clone, Deserialize)]
pub struct StepConfig {
    /// The filter to construct, resolved via the registry's `type_url`
    /// lookup.
    pub filter: TypedConfig,

    /// Which cache the step carries. Defaults to `none`.
    #[serde(default)]
    pub cache: CacheChoice,
}

/// Cache selection for a step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheChoice {
    /// The reference in-memory map cache.
    Map,

    /// No cache: the step (and, by the monotonic caching rule, everything
    /// after it) re-evaluates per input.
    #[default]
    None,
}

/// Reference to a registered filter type with its configuration payload.
#[derive(Debug, Clone, Deserialize)]
pub struct TypedConfig {
    /// Identifies the registered filter factory.
    pub type_url: String,

    /// Type-specific payload, deserialized as the factory's `Config`
    /// associated type.
    #[serde(default = "default_config")]
    pub config: serde_json::Value,
}

fn default_config() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

/// Empty configuration for filters that need no construction parameters.
///
/// Accepts any JSON value (`{}`, `null`, etc.) and ignores it. Use as the
/// `Config` associated type in [`IntoFilter`](crate::IntoFilter) for
/// self-contained filters.
#[derive(Debug, Clone, Copy)]
pub struct UnitConfig;

impl<'de> Deserialize<'de> for UnitConfig {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde::de::IgnoredAny::deserialize(deserializer)?;
        Ok(UnitConfig)
    }
}
