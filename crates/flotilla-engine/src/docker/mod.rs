//! Docker adapter: [`ContainerEngine`] implemented on top of bollard.
//!
//! Every call is wrapped in a bounded timeout so a hung engine socket
//! cannot stall the reaper or concurrent creation requests.

mod connect;

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use bollard::{
    Docker,
    auth::DockerCredentials,
    models::{ContainerCreateBody, ContainerSummary},
    query_parameters::{
        CreateContainerOptionsBuilder, CreateImageOptionsBuilder, InspectContainerOptions,
        ListContainersOptionsBuilder, RemoveContainerOptionsBuilder, StartContainerOptions,
    },
};
use futures_util::TryStreamExt;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tracing::{debug, trace};

use flotilla_model::{FleetSettings, Labels, RegistrySettings};

use crate::{
    engine::ContainerEngine,
    error::{EngineError, EngineResult},
    handle::{ContainerHandle, ContainerSpec, ImageSummary},
};

/// Default bound for a single engine call.
const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// Image pulls stream layers and can legitimately take much longer.
const DEFAULT_PULL_TIMEOUT: Duration = Duration::from_secs(600);

/// [`ContainerEngine`] backed by a Docker-compatible daemon.
///
/// One long-lived instance is constructed at startup and shared by all
/// callers; bollard's client is safe for concurrent use.
pub struct DockerEngine {
    docker: Docker,
    call_timeout: Duration,
    pull_timeout: Duration,
}

impl DockerEngine {
    /// Connect using the validated settings (endpoint URI plus optional
    /// TLS material).
    pub fn connect(settings: &FleetSettings) -> EngineResult<Self> {
        let docker = connect::client_for(settings)?;
        Ok(Self {
            docker,
            call_timeout: DEFAULT_CALL_TIMEOUT,
            pull_timeout: DEFAULT_PULL_TIMEOUT,
        })
    }

    /// Wrap an existing client; used by callers that manage their own
    /// connection setup.
    pub fn from_client(docker: Docker) -> Self {
        Self {
            docker,
            call_timeout: DEFAULT_CALL_TIMEOUT,
            pull_timeout: DEFAULT_PULL_TIMEOUT,
        }
    }

    /// Override the per-call timeout bounds.
    pub fn with_timeouts(mut self, call_timeout: Duration, pull_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self.pull_timeout = pull_timeout;
        self
    }

    /// Run one engine call under the given bound.
    async fn bounded<T, F>(
        &self,
        operation: &'static str,
        timeout: Duration,
        fut: F,
    ) -> Result<T, EngineError>
    where
        F: Future<Output = Result<T, bollard::errors::Error>>,
    {
        match tokio::time::timeout(timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => Err(EngineError::Transport(err)),
            Err(_) => Err(EngineError::Timeout {
                operation,
                timeout_secs: timeout.as_secs(),
            }),
        }
    }
}

#[async_trait]
impl ContainerEngine for DockerEngine {
    async fn create_container(&self, spec: &ContainerSpec) -> EngineResult<ContainerHandle> {
        trace!(name = %spec.name, image = %spec.image, "creating container");

        let body = ContainerCreateBody {
            image: Some(spec.image.clone()),
            env: Some(spec.env.to_engine_strings()),
            labels: Some(
                spec.labels
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect::<HashMap<_, _>>(),
            ),
            ..ContainerCreateBody::default()
        };

        let options = CreateContainerOptionsBuilder::new().name(&spec.name).build();
        self.bounded(
            "create_container",
            self.call_timeout,
            self.docker.create_container(Some(options), body),
        )
        .await?;

        self.bounded(
            "start_container",
            self.call_timeout,
            self.docker
                .start_container(&spec.name, None::<StartContainerOptions>),
        )
        .await?;

        // Re-query so the handle reflects engine-assigned id and time.
        self.find_container(&spec.name).await
    }

    async fn pull_image(&self, image: &str, auth: Option<&RegistrySettings>) -> EngineResult<()> {
        let (from_image, tag) = split_image(image);
        debug!(image, "pulling image");

        let mut options = CreateImageOptionsBuilder::new().from_image(from_image);
        if let Some(tag) = tag {
            options = options.tag(tag);
        }
        let options = options.build();
        let credentials = auth.map(|auth| DockerCredentials {
            username: Some(auth.username.clone()),
            password: Some(auth.password.clone()),
            serveraddress: Some(auth.server.clone()),
            ..DockerCredentials::default()
        });

        let pull = self
            .docker
            .create_image(Some(options), None, credentials)
            .try_collect::<Vec<_>>();

        match self.bounded("pull_image", self.pull_timeout, pull).await {
            Ok(_) => Ok(()),
            Err(EngineError::Transport(err)) if EngineError::is_not_found(&err) => {
                Err(EngineError::ImageNotFound {
                    image: image.to_string(),
                })
            }
            Err(other) => Err(other),
        }
    }

    async fn inspect_image(&self, image: &str) -> EngineResult<ImageSummary> {
        let inspect = self
            .bounded(
                "inspect_image",
                self.call_timeout,
                self.docker.inspect_image(image),
            )
            .await;

        match inspect {
            Ok(meta) => Ok(ImageSummary {
                id: meta.id.unwrap_or_default(),
            }),
            Err(EngineError::Transport(err)) if EngineError::is_not_found(&err) => {
                Err(EngineError::ImageNotFound {
                    image: image.to_string(),
                })
            }
            Err(other) => Err(other),
        }
    }

    async fn find_container(&self, name: &str) -> EngineResult<ContainerHandle> {
        let inspect = self
            .bounded(
                "inspect_container",
                self.call_timeout,
                self.docker
                    .inspect_container(name, None::<InspectContainerOptions>),
            )
            .await;

        match inspect {
            Ok(meta) => {
                let labels = meta
                    .config
                    .as_ref()
                    .and_then(|c| c.labels.as_ref())
                    .map(labels_from_map)
                    .unwrap_or_default();

                Ok(ContainerHandle {
                    id: meta.id.unwrap_or_default(),
                    name: meta
                        .name
                        .as_deref()
                        .map(strip_name_slash)
                        .unwrap_or(name)
                        .to_string(),
                    created_at: parse_created(meta.created.as_deref()),
                    environment: ContainerHandle::environment_from(&labels),
                })
            }
            Err(EngineError::Transport(err)) if EngineError::is_not_found(&err) => {
                Err(EngineError::ContainerNotFound {
                    name: name.to_string(),
                })
            }
            Err(other) => Err(other),
        }
    }

    async fn list_containers(&self, filter: &Labels) -> EngineResult<Vec<ContainerHandle>> {
        let mut filters: HashMap<String, Vec<String>> = HashMap::new();
        filters.insert(
            "label".to_string(),
            filter.iter().map(|(k, v)| format!("{k}={v}")).collect(),
        );

        let options = ListContainersOptionsBuilder::new()
            .all(true)
            .filters(&filters)
            .build();

        let summaries = self
            .bounded(
                "list_containers",
                self.call_timeout,
                self.docker.list_containers(Some(options)),
            )
            .await?;

        Ok(summaries.iter().map(handle_from_summary).collect())
    }

    async fn remove_container(&self, name: &str) -> EngineResult<()> {
        let options = RemoveContainerOptionsBuilder::new().force(true).v(true).build();
        let removed = self
            .bounded(
                "remove_container",
                self.call_timeout,
                self.docker.remove_container(name, Some(options)),
            )
            .await;

        match removed {
            Ok(()) => Ok(()),
            Err(EngineError::Transport(err)) if EngineError::is_not_found(&err) => {
                Err(EngineError::ContainerNotFound {
                    name: name.to_string(),
                })
            }
            Err(other) => Err(other),
        }
    }
}

/// Docker reports names with a leading slash.
fn strip_name_slash(name: &str) -> &str {
    name.strip_prefix('/').unwrap_or(name)
}

/// Split an image reference into name and tag, defaulting to `latest`.
///
/// A colon inside the registry host (`registry:5000/img`) is not a tag
/// separator. Digest references (`img@sha256:...`) carry no tag; the
/// full reference is passed through untouched.
fn split_image(image: &str) -> (&str, Option<&str>) {
    if image.contains('@') {
        return (image, None);
    }
    match image.rsplit_once(':') {
        Some((name, tag)) if !tag.contains('/') => (name, Some(tag)),
        _ => (image, Some("latest")),
    }
}

/// Parse the engine's RFC3339 creation timestamp.
///
/// Falls back to "now" when absent or unparseable, which keeps a fresh
/// container from being mistaken for an idle one.
fn parse_created(created: Option<&str>) -> OffsetDateTime {
    created
        .and_then(|raw| OffsetDateTime::parse(raw, &Rfc3339).ok())
        .unwrap_or_else(OffsetDateTime::now_utc)
}

fn labels_from_map(map: &HashMap<String, String>) -> Labels {
    let mut labels = Labels::new();
    for (k, v) in map {
        labels.insert(k.clone(), v.clone());
    }
    labels
}

fn handle_from_summary(summary: &ContainerSummary) -> ContainerHandle {
    let labels = summary
        .labels
        .as_ref()
        .map(labels_from_map)
        .unwrap_or_default();

    ContainerHandle {
        id: summary.id.clone().unwrap_or_default(),
        name: summary
            .names
            .as_ref()
            .and_then(|names| names.first())
            .map(|n| strip_name_slash(n).to_string())
            .unwrap_or_default(),
        created_at: summary
            .created
            .and_then(|secs| OffsetDateTime::from_unix_timestamp(secs).ok())
            .unwrap_or_else(OffsetDateTime::now_utc),
        environment: ContainerHandle::environment_from(&labels),
    }
}
