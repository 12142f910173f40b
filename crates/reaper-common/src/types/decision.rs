//! Decision and Verdict - per-rule votes and their aggregate

use serde::{Deserialize, Serialize};

/// One rule's vote on one pod
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    /// Whether the rule wants the pod reaped
    pub should_reap: bool,
    /// Human-readable reason, empty when not reaping
    pub reason: String,
}

impl Decision {
    /// Vote to reap the pod
    pub fn reap(reason: impl Into<String>) -> Self {
        Self {
            should_reap: true,
            reason: reason.into(),
        }
    }

    /// Vote to leave the pod alone
    pub fn spare() -> Self {
        Self::default()
    }
}

/// Aggregated outcome for a pod across every loaded rule
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// Pod the verdict is about, rendered as `namespace/name`
    pub pod: String,
    /// True when any rule voted to reap
    pub reap: bool,
    /// Non-empty reasons in rule order
    pub reasons: Vec<String>,
}

impl Verdict {
    /// Start an empty (spare) verdict for a pod
    pub fn new(pod: impl Into<String>) -> Self {
        Self {
            pod: pod.into(),
            ..Default::default()
        }
    }

    /// Fold one rule's decision into the verdict
    pub fn record(&mut self, decision: Decision) {
        self.reap |= decision.should_reap;
        if !decision.reason.is_empty() {
            self.reasons.push(decision.reason);
        }
    }

    /// Reasons joined for logging
    pub fn reason(&self) -> String {
        self.reasons.join("; ")
    }
}
