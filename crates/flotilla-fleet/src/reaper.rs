//! Background reclamation of workers that outlived the registration
//! timeout.
//!
//! Each sweep is one fresh engine query followed by a removal pass.
//! Failures on individual containers are recorded and retried on the
//! next sweep; they never abort the rest of the pass.

use std::sync::Arc;
use std::time::Duration;

use time::OffsetDateTime;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use flotilla_engine::ContainerHandle;

use crate::{error::FleetResult, manager::FleetManager};

/// Outcome of one reap sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReapReport {
    /// Managed containers seen by the sweep.
    pub examined: usize,
    /// Names removed this sweep.
    pub reaped: Vec<String>,
    /// Names whose removal failed; retried next sweep.
    pub failed: Vec<String>,
}

/// Select the containers whose age strictly exceeds `timeout_minutes`.
///
/// A container sitting exactly at the timeout gets one more sweep.
/// A negative age (engine clock ahead of ours) counts as fresh.
pub fn idle_candidates(
    fleet: &[ContainerHandle],
    now: OffsetDateTime,
    timeout_minutes: u64,
) -> Vec<&ContainerHandle> {
    let timeout = time::Duration::minutes(timeout_minutes as i64);
    fleet.iter().filter(|c| c.age(now) > timeout).collect()
}

/// Periodic sweeper that removes idle workers.
pub struct IdleReaper {
    manager: Arc<FleetManager>,
    interval: Duration,
}

impl IdleReaper {
    pub fn new(manager: Arc<FleetManager>, interval: Duration) -> Self {
        Self { manager, interval }
    }

    /// Run one sweep over the current fleet.
    #[instrument(level = "debug", skip(self))]
    pub async fn reap_once(&self) -> FleetResult<ReapReport> {
        let fleet = self.manager.list_managed().await?;
        let now = OffsetDateTime::now_utc();
        let timeout = self.manager.settings().auto_register_timeout_minutes;

        let mut report = ReapReport {
            examined: fleet.len(),
            ..ReapReport::default()
        };

        for candidate in idle_candidates(&fleet, now, timeout) {
            match self
                .manager
                .terminate_with_reason(&candidate.name, "idle")
                .await
            {
                Ok(()) => report.reaped.push(candidate.name.clone()),
                Err(err) => {
                    warn!(name = %candidate.name, error = %err, "failed to reap container");
                    self.manager.metrics().record_reap_failure();
                    report.failed.push(candidate.name.clone());
                }
            }
        }

        if !report.reaped.is_empty() {
            info!(
                examined = report.examined,
                reaped = report.reaped.len(),
                "reap sweep removed idle containers"
            );
        }
        Ok(report)
    }

    /// Sweep on a fixed interval until `cancel` fires.
    ///
    /// The first sweep happens one full interval after startup, giving
    /// freshly restarted fleets time to register.
    pub async fn run(self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("idle reaper stopped");
                    return;
                }
                _ = ticker.tick() => {
                    if let Err(err) = self.reap_once().await {
                        warn!(error = %err, "reap sweep failed");
                    }
                }
            }
        }
    }
}
