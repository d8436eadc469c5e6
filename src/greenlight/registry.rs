//! Named evaluators and gates built from configuration.
//!
//! Configuration shapes:
//!
//! - `null`: no gate
//! - `"name"`: a single evaluator
//! - `["a", "b"]`: a sequence of evaluators
//! - `{"evaluations": ["a", "b"], "evaluator": "all"}`: a composite gate,
//!   where `evaluator` names an aggregator
//!
//! Any other shape, and any unknown name, is a configuration error.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use super::context::GateContext;
use super::gate::{aggregator, evaluator, Aggregator, Decision, Evaluator, Greenlight, Verdict};
use crate::errors::{StoreError, StoreResult};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CompositeConfig {
    evaluations: Vec<String>,
    evaluator: String,
}

/// Registry of named evaluators and aggregators.
#[derive(Clone, Default)]
pub struct GreenlightRegistry {
    evaluators: BTreeMap<String, Evaluator>,
    aggregators: BTreeMap<String, Aggregator>,
}

impl GreenlightRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the built-in policies.
    ///
    /// Evaluators: `allow_all`, `deny_all`, `require_object`, `string_key`.
    /// Aggregators: `all`, `any`, `majority`.
    pub fn builtin() -> Self {
        let mut registry = Self::new();

        registry.register_evaluator("allow_all", evaluator(|_| Verdict::allow()));
        registry.register_evaluator(
            "deny_all",
            evaluator(|ctx| Verdict::deny(format!("{} denied by deny_all", ctx.operation))),
        );
        registry.register_evaluator("require_object", evaluator(require_object));
        registry.register_evaluator("string_key", evaluator(string_key));

        registry.register_aggregator("all", aggregator(|results, _| all_allow(results)));
        registry.register_aggregator("any", aggregator(|results, _| any_allows(results)));
        registry.register_aggregator("majority", aggregator(|results, _| majority_allows(results)));

        registry
    }

    pub fn register_evaluator(&mut self, name: impl Into<String>, evaluator: Evaluator) {
        self.evaluators.insert(name.into(), evaluator);
    }

    pub fn register_aggregator(&mut self, name: impl Into<String>, aggregator: Aggregator) {
        self.aggregators.insert(name.into(), aggregator);
    }

    pub fn evaluator_names(&self) -> impl Iterator<Item = &str> {
        self.evaluators.keys().map(String::as_str)
    }

    /// Build a gate from its JSON configuration.
    pub fn resolve(&self, config: &Value) -> StoreResult<Greenlight> {
        match config {
            Value::Null => Ok(Greenlight::None),
            Value::String(name) => Ok(Greenlight::Single(self.evaluator(name)?)),
            Value::Array(items) => {
                let evaluators = items
                    .iter()
                    .map(|item| match item {
                        Value::String(name) => self.evaluator(name),
                        other => Err(StoreError::configuration(format!(
                            "greenlight sequence entries must be evaluator names, got {}",
                            other
                        ))),
                    })
                    .collect::<StoreResult<Vec<_>>>()?;
                Ok(Greenlight::Sequence(evaluators))
            }
            Value::Object(map) if map.contains_key("evaluator") => {
                let composite: CompositeConfig = serde_json::from_value(config.clone())
                    .map_err(|e| {
                        StoreError::configuration(format!("invalid composite greenlight: {}", e))
                    })?;
                let evaluations = composite
                    .evaluations
                    .iter()
                    .map(|name| self.evaluator(name))
                    .collect::<StoreResult<Vec<_>>>()?;
                let aggregator = self
                    .aggregators
                    .get(&composite.evaluator)
                    .cloned()
                    .ok_or_else(|| {
                        StoreError::configuration(format!(
                            "unknown greenlight aggregator '{}'",
                            composite.evaluator
                        ))
                    })?;
                Ok(Greenlight::Composite {
                    evaluations,
                    aggregator,
                })
            }
            other => Err(StoreError::configuration(format!(
                "greenlight must be an evaluator name, a list of evaluator names, \
                 or {{\"evaluations\", \"evaluator\"}}; was {}",
                other
            ))),
        }
    }

    /// Read a gate configuration file and resolve it.
    pub fn load(&self, path: &Path) -> StoreResult<Greenlight> {
        let content = fs::read_to_string(path).map_err(|e| {
            StoreError::configuration(format!(
                "failed to read greenlight config {}: {}",
                path.display(),
                e
            ))
        })?;
        let config: Value = serde_json::from_str(&content).map_err(|e| {
            StoreError::configuration(format!(
                "invalid greenlight config {}: {}",
                path.display(),
                e
            ))
        })?;
        self.resolve(&config)
    }

    fn evaluator(&self, name: &str) -> StoreResult<Evaluator> {
        self.evaluators.get(name).cloned().ok_or_else(|| {
            StoreError::configuration(format!("unknown greenlight evaluator '{}'", name))
        })
    }
}

fn require_object(ctx: &GateContext<'_>) -> Verdict {
    if let Some(record) = ctx.record {
        if !record.is_object() {
            return Verdict::deny("record must be a JSON object");
        }
    }
    if let Some(list) = ctx.list {
        if let Some(position) = list.iter().position(|r| !r.is_object()) {
            return Verdict::deny(format!("record {} is not a JSON object", position));
        }
    }
    Verdict::allow()
}

fn string_key(ctx: &GateContext<'_>) -> Verdict {
    match ctx.key {
        Some(key) if !key.is_string() => Verdict::deny(format!("key {} is not a string", key)),
        _ => Verdict::allow(),
    }
}

fn denial_reasons(results: &[Verdict]) -> Vec<String> {
    results
        .iter()
        .filter(|r| !r.allow)
        .map(|r| r.reason.clone().unwrap_or_else(|| "denied".to_string()))
        .collect()
}

fn all_allow(results: &[Verdict]) -> Decision {
    if results.iter().all(|r| r.allow) {
        Decision::allow()
    } else {
        Decision::deny(denial_reasons(results))
    }
}

fn any_allows(results: &[Verdict]) -> Decision {
    if results.iter().any(|r| r.allow) {
        Decision::allow()
    } else {
        let mut reasons = denial_reasons(results);
        if reasons.is_empty() {
            reasons.push("no evaluation allowed the operation".to_string());
        }
        Decision::deny(reasons)
    }
}

fn majority_allows(results: &[Verdict]) -> Decision {
    let allowed = results.iter().filter(|r| r.allow).count();
    if allowed * 2 > results.len() {
        Decision::allow()
    } else {
        let mut reasons = denial_reasons(results);
        reasons.push(format!("{} of {} evaluations allowed", allowed, results.len()));
        Decision::deny(reasons)
    }
}
