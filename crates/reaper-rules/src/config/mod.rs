//! Configuration sources rules read at load time
//!
//! Rules never touch the process environment directly. They are handed a
//! [`ConfigSource`] built once at startup:
//! - [`EnvSettings`]: snapshot of the process environment
//! - [`MapSource`]: injected key/value pairs

use std::collections::HashMap;

use reaper_common::{Result, ENV_EXPLICIT_LOAD};
use tracing::warn;

/// Environment-style key/value lookup
pub trait ConfigSource: Send + Sync {
    /// Value for `key` with surrounding whitespace trimmed, `None` when unset
    fn lookup(&self, key: &str) -> Option<String>;
}

/// Snapshot of the process environment taken when constructed
///
/// Keys match exactly. The `config` environment source folds keys to
/// lowercase, so the original spellings are kept alongside it: a key that was
/// only set under another case is absent, and a key set under more than one
/// case is ambiguous and rejected.
#[derive(Debug, Clone)]
pub struct EnvSettings {
    settings: config::Config,
    /// Lowercased key to every spelling it was set under
    spellings: HashMap<String, Vec<String>>,
}

impl EnvSettings {
    /// Snapshot the current process environment
    pub fn from_env() -> Result<Self> {
        Self::from_vars(
            std::env::vars_os()
                .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?))),
        )
    }

    /// Snapshot an explicit set of environment variables
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: config::Map<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        let mut spellings: HashMap<String, Vec<String>> = HashMap::new();
        for key in vars.keys() {
            spellings
                .entry(key.to_lowercase())
                .or_default()
                .push(key.clone());
        }

        let settings = config::Config::builder()
            .add_source(config::Environment::default().source(Some(vars)))
            .build()?;
        Ok(Self {
            settings,
            spellings,
        })
    }
}

impl ConfigSource for EnvSettings {
    fn lookup(&self, key: &str) -> Option<String> {
        let folded = key.to_lowercase();
        let spellings = self.spellings.get(&folded)?;
        if !spellings.iter().any(|spelling| spelling == key) {
            return None;
        }
        if spellings.len() > 1 {
            warn!(
                key,
                spellings = ?spellings,
                "environment key set under several spellings, ignoring it"
            );
            return None;
        }

        self.settings
            .get_string(&folded)
            .ok()
            .map(|v| v.trim().to_string())
    }
}

/// In-memory configuration, mostly for tests and embedding
#[derive(Debug, Clone, Default)]
pub struct MapSource {
    values: HashMap<String, String>,
}

impl MapSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapSource {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl ConfigSource for MapSource {
    fn lookup(&self, key: &str) -> Option<String> {
        self.values.get(key).map(|v| v.trim().to_string())
    }
}

/// Rule names listed in `EXPLICIT_LOAD`, split on commas and whitespace
pub fn explicit_load_list(config: &dyn ConfigSource) -> Vec<String> {
    config
        .lookup(ENV_EXPLICIT_LOAD)
        .map(|raw| {
            raw.split(|c: char| c == ',' || c.is_whitespace())
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Whether `rule` must be force-enabled without its own setting
pub fn is_explicitly_loaded(config: &dyn ConfigSource, rule: &str) -> bool {
    explicit_load_list(config).iter().any(|name| name == rule)
}
