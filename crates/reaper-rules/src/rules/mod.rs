//! Rule contract and the catalogue of rule kinds
//!
//! Every rule is loaded once from a [`ConfigSource`] and then asked, for each
//! pod, whether that pod should be reaped. Loaded state is read-only after
//! `load`, so one rule instance can serve many pods concurrently.

pub mod chaos;

pub use self::chaos::ChaosRule;

use reaper_common::{Decision, Pod, RuleError};

use crate::config::ConfigSource;
use crate::random::SharedChanceSource;

/// A pluggable unit that votes on whether a pod should be reaped
pub trait Rule: Send + Sync + std::fmt::Debug {
    /// Stable identifier, also the name used in `EXPLICIT_LOAD`
    fn name(&self) -> &'static str;

    /// Read this rule's settings, replacing any previously loaded state
    fn load(&mut self, config: &dyn ConfigSource) -> Result<LoadStatus, RuleError>;

    /// Vote on a pod. Unloaded or disabled rules always spare.
    fn should_reap(&self, pod: &Pod) -> Decision;
}

/// Outcome of a successful `load`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// Rule participates in evaluation
    Loaded { message: String },
    /// Rule is not configured; skip it
    NotLoaded,
}

impl LoadStatus {
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadStatus::Loaded { .. })
    }

    /// Human-readable load message, empty when not loaded
    pub fn message(&self) -> &str {
        match self {
            LoadStatus::Loaded { message } => message,
            LoadStatus::NotLoaded => "",
        }
    }
}

/// Closed set of rule kinds the registry knows how to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    Chaos,
}

impl RuleKind {
    /// Every rule kind, in evaluation order
    pub const ALL: &'static [RuleKind] = &[RuleKind::Chaos];

    pub fn name(&self) -> &'static str {
        match self {
            RuleKind::Chaos => chaos::RULE_CHAOS,
        }
    }

    /// Fresh, unloaded instance of this rule
    pub fn build(&self, random: SharedChanceSource) -> Box<dyn Rule> {
        match self {
            RuleKind::Chaos => Box::new(ChaosRule::new(random)),
        }
    }
}

impl std::fmt::Display for RuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A probability setting as parsed, with the text it was configured as
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ChanceSetting {
    pub value: f64,
    /// Trimmed configured text, echoed back in load messages
    pub raw: String,
}

/// Read a probability setting; `None` when unset
pub(crate) fn read_chance(
    config: &dyn ConfigSource,
    rule: &str,
    key: &str,
) -> Result<Option<ChanceSetting>, RuleError> {
    config
        .lookup(key)
        .map(|raw| {
            let raw = raw.trim().to_string();
            parse_chance(rule, &raw).map(|value| ChanceSetting { value, raw })
        })
        .transpose()
}

/// Parse a probability, rejecting anything outside `[0.0, 1.0]`
pub(crate) fn parse_chance(rule: &str, raw: &str) -> Result<f64, RuleError> {
    let chance = raw
        .trim()
        .parse::<f64>()
        .map_err(|err| RuleError::invalid_chance(rule, raw, err))?;

    // NaN fails the range check too
    if !(0.0..=1.0).contains(&chance) {
        return Err(RuleError::invalid_chance(
            rule,
            raw,
            "must be between 0.0 and 1.0",
        ));
    }
    Ok(chance)
}
