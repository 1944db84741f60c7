use std::sync::Arc;

/// How one provisioning request ended, for metrics classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    /// Container was created and started.
    Created,
    /// Refused because the fleet is at its configured maximum.
    CapacityExceeded,
    /// Request was unusable (missing image attribute etc).
    InvalidRequest,
    /// Image could not be found locally or in the registry.
    ImageNotFound,
    /// Engine call failed or timed out.
    EngineFailure,
}

impl CreateOutcome {
    /// Return label value for metrics.
    #[inline]
    pub fn as_label(&self) -> &'static str {
        match self {
            CreateOutcome::Created => "created",
            CreateOutcome::CapacityExceeded => "capacity_exceeded",
            CreateOutcome::InvalidRequest => "invalid_request",
            CreateOutcome::ImageNotFound => "image_not_found",
            CreateOutcome::EngineFailure => "engine_failure",
        }
    }
}

/// Backend metrics collection interface.
///
/// This trait abstracts metrics collection across different backends.
/// Implementations are injected into [`crate::manager::FleetManager`]
/// and shared with the reaper.
pub trait MetricsBackend: Send + Sync + 'static {
    /// Record the outcome of one provisioning request.
    ///
    /// # Arguments
    /// - `environment`: Sanitized environment the worker was requested for
    /// - `outcome`: How the request terminated
    fn record_create(&self, environment: &str, outcome: CreateOutcome);

    /// Record one container removal.
    ///
    /// # Arguments
    /// - `reason`: `"requested"` for explicit terminations, `"idle"` for
    ///   reaper removals
    fn record_terminated(&self, reason: &'static str);

    /// Record a reap attempt that failed and will be retried next sweep.
    fn record_reap_failure(&self);

    /// Record the fleet size observed by the latest engine query.
    fn record_fleet_size(&self, size: usize);
}

/// Shared handle to metrics backend.
pub type MetricsHandle = Arc<dyn MetricsBackend>;
