//! Pod - the read-only descriptor rules vote on
//!
//! Only the metadata rules actually consult is modelled. Everything else
//! about a cluster pod is the concern of whatever lists them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Pod descriptor handed to every rule
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pod {
    /// Pod name
    #[serde(default)]
    pub name: String,

    /// Namespace the pod lives in
    #[serde(default)]
    pub namespace: String,

    /// Annotation key/value pairs
    #[serde(default)]
    pub annotations: HashMap<String, String>,
}

impl Pod {
    /// Create a pod with no annotations
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            annotations: HashMap::new(),
        }
    }

    /// Builder-style annotation setter
    pub fn with_annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.annotations.insert(key.into(), value.into());
        self
    }

    /// Annotation value with surrounding whitespace trimmed
    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.annotations.get(key).map(|v| v.trim())
    }
}

impl std::fmt::Display for Pod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}/{}", self.namespace, self.name)
        }
    }
}
