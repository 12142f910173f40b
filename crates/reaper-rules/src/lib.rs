//! # Reaper Rules
//!
//! Pluggable rules that decide whether a pod should be reaped.
//!
//! ## Evaluation
//!
//! ```text
//! reap(pod) = rule₁(pod) ∨ rule₂(pod) ∨ … ∨ ruleₙ(pod)
//! ```
//!
//! Each rule is loaded once from a [`ConfigSource`] and is read-only from then
//! on. A rule that has no settings stays out of evaluation unless it is named
//! in `EXPLICIT_LOAD`.
//!
//! ## Chaos Rule
//!
//! Flags a pod when a uniform draw in `[0, 1)` is below `CHAOS_CHANCE`, or
//! below the pod's `chaos-chance` annotation when present.

pub mod config;
pub mod random;
pub mod registry;
pub mod rules;
pub mod telemetry;

use std::sync::Arc;

pub use config::{ConfigSource, EnvSettings, MapSource};
pub use random::{ChanceSource, SharedChanceSource};
pub use registry::{LoadPolicy, LoadReport, RuleRegistry};
pub use rules::{ChaosRule, LoadStatus, Rule, RuleKind};
pub use telemetry::RuleMetrics;

/// Evaluator configuration
#[derive(Debug, Clone, Default)]
pub struct EvaluatorConfig {
    /// Behaviour when a rule fails to load
    pub load_policy: LoadPolicy,
    /// Seed for reproducible draws; thread-local entropy when unset
    pub seed: Option<u64>,
}

impl EvaluatorConfig {
    /// Random source matching the configured seed
    pub fn chance_source(&self) -> SharedChanceSource {
        match self.seed {
            Some(seed) => Arc::new(random::SeededSource::new(seed)),
            None => random::default_source(),
        }
    }
}
