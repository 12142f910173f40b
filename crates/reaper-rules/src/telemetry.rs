//! Prometheus counters for rule loading and evaluation

use prometheus::{IntCounterVec, Opts, Registry};
use reaper_common::{Decision, Result};

/// Counters updated by the rule registry
#[derive(Debug, Clone)]
pub struct RuleMetrics {
    pub decisions_total: IntCounterVec,
    pub load_failures_total: IntCounterVec,
}

impl RuleMetrics {
    pub fn new() -> Result<Self> {
        Ok(Self {
            decisions_total: IntCounterVec::new(
                Opts::new(
                    "reaper_rule_decisions_total",
                    "Rule decisions by rule and outcome",
                ),
                &["rule", "outcome"],
            )?,
            load_failures_total: IntCounterVec::new(
                Opts::new(
                    "reaper_rule_load_failures_total",
                    "Rules that failed to load",
                ),
                &["rule"],
            )?,
        })
    }

    pub fn register(&self, registry: &Registry) -> Result<()> {
        registry.register(Box::new(self.decisions_total.clone()))?;
        registry.register(Box::new(self.load_failures_total.clone()))?;
        Ok(())
    }

    pub fn record_decision(&self, rule: &str, decision: &Decision) {
        let outcome = if decision.should_reap { "reap" } else { "spare" };
        self.decisions_total
            .with_label_values(&[rule, outcome])
            .inc();
    }

    pub fn record_load_failure(&self, rule: &str) {
        self.load_failures_total.with_label_values(&[rule]).inc();
    }
}
