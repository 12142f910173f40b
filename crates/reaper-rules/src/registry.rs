//! Rule registry: loads the rule catalogue once and aggregates votes per pod
//!
//! A pod is reaped when any loaded rule votes to reap it. Reasons from every
//! rule that voted are kept for logging.

use std::str::FromStr;
use std::sync::Arc;

use reaper_common::{Pod, ReaperError, Result, RuleError, Verdict};
use tracing::{debug, error, info, instrument, warn};

use crate::config::ConfigSource;
use crate::random::SharedChanceSource;
use crate::rules::{LoadStatus, Rule, RuleKind};
use crate::telemetry::RuleMetrics;

/// What to do when a rule fails to load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPolicy {
    /// Abort loading on the first failure
    #[default]
    FailFast,
    /// Log the failure and carry on with the remaining rules
    SkipFailed,
}

impl FromStr for LoadPolicy {
    type Err = ReaperError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail-fast" | "fail_fast" => Ok(LoadPolicy::FailFast),
            "skip-failed" | "skip_failed" => Ok(LoadPolicy::SkipFailed),
            other => Err(ReaperError::Config(format!("unknown load policy: {}", other))),
        }
    }
}

/// Summary of a registry load
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    /// Load messages of rules that are active
    pub loaded: Vec<String>,
    /// Rules with no configuration
    pub skipped: Vec<&'static str>,
    /// Rules that failed under `LoadPolicy::SkipFailed`
    pub failed: Vec<(&'static str, RuleError)>,
}

/// Loaded rules, read-only once built
pub struct RuleRegistry {
    rules: Vec<Box<dyn Rule>>,
    report: LoadReport,
    metrics: Option<RuleMetrics>,
}

impl RuleRegistry {
    /// Build and load every rule kind, keeping the ones that load
    pub fn load(
        config: &dyn ConfigSource,
        random: SharedChanceSource,
        policy: LoadPolicy,
    ) -> Result<Self> {
        Self::load_inner(config, random, policy, None)
    }

    /// Like [`RuleRegistry::load`], counting load failures and later
    /// decisions in `metrics`. Failures are counted even when loading
    /// ends in an error.
    pub fn load_with_metrics(
        config: &dyn ConfigSource,
        random: SharedChanceSource,
        policy: LoadPolicy,
        metrics: RuleMetrics,
    ) -> Result<Self> {
        Self::load_inner(config, random, policy, Some(metrics))
    }

    fn load_inner(
        config: &dyn ConfigSource,
        random: SharedChanceSource,
        policy: LoadPolicy,
        metrics: Option<RuleMetrics>,
    ) -> Result<Self> {
        let mut rules = Vec::new();
        let mut report = LoadReport::default();

        for kind in RuleKind::ALL {
            let mut rule = kind.build(Arc::clone(&random));
            match rule.load(config) {
                Ok(LoadStatus::Loaded { message }) => {
                    info!("loaded rule: {}", message);
                    report.loaded.push(message);
                    rules.push(rule);
                }
                Ok(LoadStatus::NotLoaded) => {
                    debug!(rule = kind.name(), "rule not configured");
                    report.skipped.push(kind.name());
                }
                Err(err) => {
                    if let Some(metrics) = &metrics {
                        metrics.record_load_failure(kind.name());
                    }
                    match policy {
                        LoadPolicy::FailFast => {
                            error!(rule = kind.name(), error = %err, "rule failed to load");
                            return Err(err.into());
                        }
                        LoadPolicy::SkipFailed => {
                            warn!(rule = kind.name(), error = %err, "skipping rule that failed to load");
                            report.failed.push((kind.name(), err));
                        }
                    }
                }
            }
        }

        if rules.is_empty() {
            return Err(RuleError::NoRulesLoaded.into());
        }

        Ok(Self {
            rules,
            report,
            metrics,
        })
    }

    /// Wrap rules that were already loaded by the caller
    pub fn from_rules(rules: Vec<Box<dyn Rule>>) -> Self {
        Self {
            rules,
            report: LoadReport::default(),
            metrics: None,
        }
    }

    /// Count decisions in `metrics`
    pub fn with_metrics(mut self, metrics: RuleMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Ask every rule about `pod` and OR the votes
    #[instrument(level = "debug", skip_all, fields(pod = %pod))]
    pub fn evaluate(&self, pod: &Pod) -> Verdict {
        let mut verdict = Verdict::new(pod.to_string());

        for rule in &self.rules {
            let decision = rule.should_reap(pod);
            if let Some(metrics) = &self.metrics {
                metrics.record_decision(rule.name(), &decision);
            }
            verdict.record(decision);
        }

        if verdict.reap {
            info!(pod = %pod, reason = %verdict.reason(), "pod flagged for reaping");
        } else {
            debug!(pod = %pod, "pod spared");
        }
        verdict
    }

    /// Evaluate pods concurrently, returning verdicts in input order
    pub async fn evaluate_all(self: Arc<Self>, pods: Vec<Pod>) -> Result<Vec<Verdict>> {
        let handles: Vec<_> = pods
            .into_iter()
            .map(|pod| {
                let registry = Arc::clone(&self);
                tokio::spawn(async move { registry.evaluate(&pod) })
            })
            .collect();

        let mut verdicts = Vec::with_capacity(handles.len());
        for handle in handles {
            let verdict = handle
                .await
                .map_err(|err| ReaperError::Internal(format!("evaluation task failed: {}", err)))?;
            verdicts.push(verdict);
        }
        Ok(verdicts)
    }
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &self.rule_names())
            .field("report", &self.report)
            .field("metrics", &self.metrics.is_some())
            .finish()
    }
}
