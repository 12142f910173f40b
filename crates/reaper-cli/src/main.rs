//! Pod Reaper Binary
//!
//! Loads the reaping rules from the environment, evaluates a JSON pod list
//! and prints one JSON verdict per line. Listing pods and deleting them is left
//! to whatever drives this binary.

mod config;

use std::io::Write;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use prometheus::{Encoder, TextEncoder};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use reaper_common::{Pod, VERSION};
use reaper_rules::{EnvSettings, RuleMetrics, RuleRegistry};

use crate::config::{LogFormat, ReaperConfig, ENV_PODS_FILE};

#[tokio::main]
async fn main() -> Result<()> {
    // Try to load .env file
    dotenvy::dotenv().ok();

    // Snapshot the environment once; rules read only from this
    let settings = EnvSettings::from_env()?;
    let config = ReaperConfig::from_source(&settings, std::env::args().nth(1))?;

    init_tracing(config.log_format);
    info!("Starting Pod Reaper v{}", VERSION);
    debug!("Loaded configuration: {:?}", config);

    let pods_file = config.pods_file.clone().ok_or_else(|| {
        anyhow!(
            "no pod list given: pass a path or set {}",
            ENV_PODS_FILE
        )
    })?;
    let raw = tokio::fs::read_to_string(&pods_file)
        .await
        .with_context(|| format!("reading {}", pods_file.display()))?;
    let pods: Vec<Pod> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing {}", pods_file.display()))?;
    info!(pods = pods.len(), "Loaded pod list from {}", pods_file.display());

    let metrics_registry = prometheus::Registry::new();
    let metrics = RuleMetrics::new()?;
    metrics.register(&metrics_registry)?;

    let registry = RuleRegistry::load_with_metrics(
        &settings,
        config.evaluator.chance_source(),
        config.evaluator.load_policy,
        metrics,
    )?;
    info!(rules = ?registry.rule_names(), "Rules loaded");

    let registry = Arc::new(registry);
    let verdicts = registry.evaluate_all(pods).await?;

    let mut stdout = std::io::stdout().lock();
    for verdict in &verdicts {
        serde_json::to_writer(&mut stdout, verdict)?;
        writeln!(stdout)?;
    }
    stdout.flush()?;

    let reaped = verdicts.iter().filter(|v| v.reap).count();
    info!(total = verdicts.len(), reaped, "Evaluation complete");

    let mut buffer = Vec::new();
    TextEncoder::new().encode(&metrics_registry.gather(), &mut buffer)?;
    debug!("Rule metrics:\n{}", String::from_utf8_lossy(&buffer));

    Ok(())
}

/// Logs go to stderr so stdout carries only verdicts
fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}
