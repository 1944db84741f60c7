use std::{collections::BTreeMap, sync::Arc, time::Duration};

use anyhow::{Context, bail};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use flotilla_engine::DockerEngine;
use flotilla_fleet::prelude::{FleetManager, IdleReaper};
use flotilla_model::{FleetSettings, SETTINGS_KEYS};
use flotilla_observe::{LoggerConfig, init_logger};
use flotilla_prometheus::PrometheusMetrics;

/// Seconds between reap sweeps unless overridden via
/// `FLOTILLA_REAP_INTERVAL_SECS`.
const DEFAULT_REAP_INTERVAL_SECS: u64 = 60;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    // 1) logger
    let cfg = LoggerConfig::from_env()?;
    init_logger(&cfg)?;
    info!("logger initialized");

    // 2) settings from environment
    let settings = load_settings()?;
    info!(
        docker_uri = %settings.docker_uri,
        max_containers = settings.max_containers,
        "settings validated"
    );

    // 3) engine + metrics + manager
    let engine = Arc::new(DockerEngine::connect(&settings)?);
    let metrics = PrometheusMetrics::new().context("metrics registry setup failed")?;
    let manager = Arc::new(
        FleetManager::new(engine, settings).with_metrics(Arc::new(metrics.clone())),
    );

    // 4) idle reaper in the background
    let cancel = CancellationToken::new();
    let reaper = IdleReaper::new(Arc::clone(&manager), reap_interval());
    let reaper_task = tokio::spawn(reaper.run(cancel.clone()));

    let fleet = manager.list_managed().await?;
    info!(containers = fleet.len(), "fleet manager ready");

    // 5) run until interrupted
    tokio::signal::ctrl_c().await?;
    info!("shutting down");
    cancel.cancel();
    reaper_task.await?;

    Ok(())
}

/// Read every settings key from `FLOTILLA_<KEY>` environment variables
/// and validate the lot. All findings are logged before exiting.
fn load_settings() -> anyhow::Result<FleetSettings> {
    let mut raw = BTreeMap::new();
    for key in SETTINGS_KEYS {
        let var = format!("FLOTILLA_{}", key.to_ascii_uppercase());
        if let Ok(value) = std::env::var(&var) {
            raw.insert(key.to_string(), value);
        }
    }

    match FleetSettings::from_raw(&raw) {
        Ok(settings) => Ok(settings),
        Err(findings) => {
            for finding in &findings {
                error!(key = %finding.key, "{}", finding.message);
            }
            bail!("configuration is invalid ({} findings)", findings.len());
        }
    }
}

fn reap_interval() -> Duration {
    let secs = std::env::var("FLOTILLA_REAP_INTERVAL_SECS")
        .ok()
        .and_then(|raw| raw.trim().parse::<u64>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(DEFAULT_REAP_INTERVAL_SECS);
    Duration::from_secs(secs)
}
