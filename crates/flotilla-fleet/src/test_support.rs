//! In-memory [`ContainerEngine`] used by manager and reaper tests.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use time::OffsetDateTime;

use flotilla_engine::{
    ContainerEngine, ContainerHandle, ContainerSpec, EngineError, EngineResult, ImageSummary,
};
use flotilla_model::{Env, LABEL_ENVIRONMENT, LABEL_MANAGED, LABEL_MANAGED_VALUE, Labels,
    RegistrySettings};

#[derive(Clone)]
struct FakeContainer {
    id: String,
    name: String,
    created_at: OffsetDateTime,
    labels: Labels,
    env: Env,
}

impl FakeContainer {
    fn handle(&self) -> ContainerHandle {
        ContainerHandle {
            id: self.id.clone(),
            name: self.name.clone(),
            created_at: self.created_at,
            environment: ContainerHandle::environment_from(&self.labels),
        }
    }
}

#[derive(Default)]
struct State {
    containers: Vec<FakeContainer>,
    local_images: HashSet<String>,
    registry_images: HashSet<String>,
    pulls: Vec<String>,
    pull_auths: Vec<Option<RegistrySettings>>,
    ops: Vec<&'static str>,
    fail_remove: HashSet<String>,
    next_id: u64,
}

/// Scriptable engine double. State mirrors what a real daemon would
/// hold: containers plus the set of locally and remotely available
/// images.
#[derive(Default)]
pub struct FakeEngine {
    state: Mutex<State>,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_local_image(self, image: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .local_images
            .insert(image.to_string());
        self
    }

    pub fn with_registry_image(self, image: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .registry_images
            .insert(image.to_string());
        self
    }

    /// Seed a container carrying the managed ownership labels.
    pub fn add_managed(&self, name: &str, environment: &str, created_at: OffsetDateTime) {
        let mut labels = Labels::new();
        labels.insert(LABEL_MANAGED, LABEL_MANAGED_VALUE);
        labels.insert(LABEL_ENVIRONMENT, environment);
        self.add_container(name, created_at, labels);
    }

    /// Seed a container that does not belong to the fleet.
    pub fn add_unlabeled(&self, name: &str) {
        self.add_container(name, OffsetDateTime::now_utc(), Labels::new());
    }

    fn add_container(&self, name: &str, created_at: OffsetDateTime, labels: Labels) {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let id = format!("fake-{}", state.next_id);
        state.containers.push(FakeContainer {
            id,
            name: name.to_string(),
            created_at,
            labels,
            env: Env::new(),
        });
    }

    /// Make removal of `name` fail with a non-404 engine error.
    pub fn fail_remove(&self, name: &str) {
        self.state
            .lock()
            .unwrap()
            .fail_remove
            .insert(name.to_string());
    }

    pub fn pulls(&self) -> Vec<String> {
        self.state.lock().unwrap().pulls.clone()
    }

    /// Credentials received by each pull, in call order.
    pub fn pull_auths(&self) -> Vec<Option<RegistrySettings>> {
        self.state.lock().unwrap().pull_auths.clone()
    }

    /// Engine operations invoked so far, in call order.
    pub fn ops(&self) -> Vec<&'static str> {
        self.state.lock().unwrap().ops.clone()
    }

    pub fn container_names(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .containers
            .iter()
            .map(|c| c.name.clone())
            .collect()
    }

    pub fn labels_of(&self, name: &str) -> Option<Labels> {
        self.state
            .lock()
            .unwrap()
            .containers
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.labels.clone())
    }

    pub fn env_of(&self, name: &str) -> Option<Env> {
        self.state
            .lock()
            .unwrap()
            .containers
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.env.clone())
    }
}

#[async_trait]
impl ContainerEngine for FakeEngine {
    async fn create_container(&self, spec: &ContainerSpec) -> EngineResult<ContainerHandle> {
        let mut state = self.state.lock().unwrap();
        state.ops.push("create_container");
        state.next_id += 1;
        let container = FakeContainer {
            id: format!("fake-{}", state.next_id),
            name: spec.name.clone(),
            created_at: OffsetDateTime::now_utc(),
            labels: spec.labels.clone(),
            env: spec.env.clone(),
        };
        let handle = container.handle();
        state.containers.push(container);
        Ok(handle)
    }

    async fn pull_image(&self, image: &str, auth: Option<&RegistrySettings>) -> EngineResult<()> {
        let mut state = self.state.lock().unwrap();
        state.ops.push("pull_image");
        state.pulls.push(image.to_string());
        state.pull_auths.push(auth.cloned());
        if state.registry_images.contains(image) {
            state.local_images.insert(image.to_string());
            Ok(())
        } else {
            Err(EngineError::ImageNotFound {
                image: image.to_string(),
            })
        }
    }

    async fn inspect_image(&self, image: &str) -> EngineResult<ImageSummary> {
        let mut state = self.state.lock().unwrap();
        state.ops.push("inspect_image");
        if state.local_images.contains(image) {
            Ok(ImageSummary {
                id: format!("sha256:{image}"),
            })
        } else {
            Err(EngineError::ImageNotFound {
                image: image.to_string(),
            })
        }
    }

    async fn find_container(&self, name: &str) -> EngineResult<ContainerHandle> {
        let mut state = self.state.lock().unwrap();
        state.ops.push("find_container");
        state
            .containers
            .iter()
            .find(|c| c.name == name)
            .map(FakeContainer::handle)
            .ok_or_else(|| EngineError::ContainerNotFound {
                name: name.to_string(),
            })
    }

    async fn list_containers(&self, filter: &Labels) -> EngineResult<Vec<ContainerHandle>> {
        let mut state = self.state.lock().unwrap();
        state.ops.push("list_containers");
        Ok(state
            .containers
            .iter()
            .filter(|c| c.labels.contains_all(filter))
            .map(FakeContainer::handle)
            .collect())
    }

    async fn remove_container(&self, name: &str) -> EngineResult<()> {
        let mut state = self.state.lock().unwrap();
        state.ops.push("remove_container");
        if state.fail_remove.contains(name) {
            return Err(EngineError::Timeout {
                operation: "remove_container",
                timeout_secs: 0,
            });
        }
        let before = state.containers.len();
        state.containers.retain(|c| c.name != name);
        if state.containers.len() == before {
            return Err(EngineError::ContainerNotFound {
                name: name.to_string(),
            });
        }
        Ok(())
    }
}
