//! Pod Reaper binary configuration

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use reaper_rules::{ConfigSource, EvaluatorConfig, LoadPolicy};

pub const ENV_PODS_FILE: &str = "REAPER_PODS_FILE";
pub const ENV_LOAD_POLICY: &str = "REAPER_LOAD_POLICY";
pub const ENV_SEED: &str = "REAPER_SEED";
pub const ENV_LOG_FORMAT: &str = "REAPER_LOG_FORMAT";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => bail!("unknown log format: {}", other),
        }
    }
}

/// Binary configuration
#[derive(Debug, Clone, Default)]
pub struct ReaperConfig {
    /// JSON array of pods to evaluate
    pub pods_file: Option<PathBuf>,
    /// Rule loading and randomness
    pub evaluator: EvaluatorConfig,
    pub log_format: LogFormat,
}

impl ReaperConfig {
    /// Build from configuration values; a CLI path argument takes priority
    /// over `REAPER_PODS_FILE`
    pub fn from_source(source: &dyn ConfigSource, pods_arg: Option<String>) -> Result<Self> {
        let mut cfg = Self::default();

        cfg.pods_file = pods_arg
            .or_else(|| source.lookup(ENV_PODS_FILE))
            .filter(|path| !path.is_empty())
            .map(PathBuf::from);

        if let Some(policy) = source.lookup(ENV_LOAD_POLICY) {
            cfg.evaluator.load_policy = policy.parse::<LoadPolicy>()?;
        }
        if let Some(seed) = source.lookup(ENV_SEED) {
            cfg.evaluator.seed = Some(
                seed.parse::<u64>()
                    .with_context(|| format!("{} must be an unsigned integer", ENV_SEED))?,
            );
        }
        if let Some(format) = source.lookup(ENV_LOG_FORMAT) {
            cfg.log_format = format.parse()?;
        }

        Ok(cfg)
    }
}
