//! Fleet orchestration: provisioning, lookup and termination of worker
//! containers.
//!
//! The manager holds no container registry of its own. Every decision
//! starts from a fresh engine query filtered by the ownership labels, so
//! restarts lose nothing and concurrent managers converge on the same
//! view.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use flotilla_engine::{ContainerEngine, ContainerHandle, ContainerSpec, EngineError};
use flotilla_model::{
    AgentRequest, ENV_AUTO_REGISTER_ENVIRONMENT, ENV_AUTO_REGISTER_KEY, ENV_AUTO_REGISTER_TIMEOUT,
    ENV_SERVER_URL, Env, FleetSettings,
};

use crate::{
    capacity,
    error::{FleetError, FleetResult},
    identity,
    metrics::{CreateOutcome, MetricsHandle, noop_metrics},
};

/// Orchestrates one fleet of worker containers against one engine.
pub struct FleetManager {
    engine: Arc<dyn ContainerEngine>,
    settings: FleetSettings,
    metrics: MetricsHandle,
}

impl FleetManager {
    /// Build a manager over the given engine with no-op metrics.
    pub fn new(engine: Arc<dyn ContainerEngine>, settings: FleetSettings) -> Self {
        Self {
            engine,
            settings,
            metrics: noop_metrics(),
        }
    }

    /// Replace the metrics backend.
    pub fn with_metrics(mut self, metrics: MetricsHandle) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn settings(&self) -> &FleetSettings {
        &self.settings
    }

    pub(crate) fn metrics(&self) -> &MetricsHandle {
        &self.metrics
    }

    /// Provision one worker container for a CI job request.
    ///
    /// Steps, in order: validate the request, re-count the fleet, check
    /// capacity, make sure the image is available (pulling at most once),
    /// then create and start the container. Failure at any step aborts
    /// the whole request.
    #[instrument(level = "debug", skip(self, request), fields(environment = %request.environment()))]
    pub async fn create_agent(&self, request: &AgentRequest) -> FleetResult<ContainerHandle> {
        let environment = identity::sanitize_environment(request.environment());
        let result = self.create_inner(request).await;

        let outcome = match &result {
            Ok(_) => CreateOutcome::Created,
            Err(FleetError::Configuration(_)) => CreateOutcome::InvalidRequest,
            Err(FleetError::CapacityExceeded { .. }) => CreateOutcome::CapacityExceeded,
            Err(FleetError::Engine(EngineError::ImageNotFound { .. })) => {
                CreateOutcome::ImageNotFound
            }
            Err(FleetError::Engine(_)) => CreateOutcome::EngineFailure,
        };
        self.metrics.record_create(&environment, outcome);

        result
    }

    async fn create_inner(&self, request: &AgentRequest) -> FleetResult<ContainerHandle> {
        // Request validation comes first; nothing touches the engine for
        // an unusable request.
        let image = request.image()?.to_string();

        let fleet = self.list_managed().await?;
        capacity::admit(fleet.len(), &self.settings)?;

        self.resolve_image(&image).await?;

        let name = identity::derive_name(request.environment());
        let spec = ContainerSpec {
            name,
            image,
            env: self.agent_env(request),
            labels: identity::ownership_labels(request.environment(), request.key()),
        };

        let handle = self.engine.create_container(&spec).await?;
        info!(name = %handle.name, id = %handle.id, "worker container started");
        Ok(handle)
    }

    /// Make sure `image` is present locally, pulling it at most once.
    ///
    /// An image that is already local is never re-pulled; an image absent
    /// from both the engine and its registry fails the request with
    /// [`EngineError::ImageNotFound`].
    async fn resolve_image(&self, image: &str) -> FleetResult<()> {
        match self.engine.inspect_image(image).await {
            Ok(_) => Ok(()),
            Err(EngineError::ImageNotFound { .. }) => {
                info!(image, "image not present locally, pulling");
                self.engine
                    .pull_image(image, self.settings.registry.as_ref())
                    .await?;
                Ok(())
            }
            Err(other) => Err(other.into()),
        }
    }

    /// Environment injected into every worker, layered over whatever the
    /// request's `Environment` property supplies. Injected values win on
    /// key collision.
    fn agent_env(&self, request: &AgentRequest) -> Env {
        let mut injected = Env::new();
        injected.push(ENV_SERVER_URL, self.settings.go_server_url.as_str());
        injected.push(ENV_AUTO_REGISTER_KEY, request.key());
        injected.push(
            ENV_AUTO_REGISTER_ENVIRONMENT,
            request.environment(),
        );
        injected.push(
            ENV_AUTO_REGISTER_TIMEOUT,
            self.settings.auto_register_timeout_minutes.to_string(),
        );

        request.extra_env().merged(&injected)
    }

    /// Remove a container by name.
    ///
    /// Idempotent: a name the engine no longer knows is treated as
    /// already terminated and succeeds.
    #[instrument(level = "debug", skip(self))]
    pub async fn terminate(&self, name: &str) -> FleetResult<()> {
        self.terminate_with_reason(name, "requested").await
    }

    pub(crate) async fn terminate_with_reason(
        &self,
        name: &str,
        reason: &'static str,
    ) -> FleetResult<()> {
        match self.engine.remove_container(name).await {
            Ok(()) => {
                self.metrics.record_terminated(reason);
                info!(name, reason, "worker container removed");
                Ok(())
            }
            Err(EngineError::ContainerNotFound { .. }) => {
                debug!(name, "container already gone");
                Ok(())
            }
            Err(other) => Err(other.into()),
        }
    }

    /// Look up a managed container by its exact name.
    pub async fn find(&self, name: &str) -> FleetResult<Option<ContainerHandle>> {
        match self.engine.find_container(name).await {
            Ok(handle) => Ok(Some(handle)),
            Err(EngineError::ContainerNotFound { .. }) => Ok(None),
            Err(other) => Err(other.into()),
        }
    }

    /// Fresh engine query for every container this service manages.
    pub async fn list_managed(&self) -> FleetResult<Vec<ContainerHandle>> {
        let fleet = self
            .engine
            .list_containers(&identity::managed_filter())
            .await?;
        self.metrics.record_fleet_size(fleet.len());
        Ok(fleet)
    }
}
