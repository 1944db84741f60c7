//! Capability interface over the container runtime.
//!
//! Everything above the adapter depends on this trait, never on the
//! concrete client, so orchestration logic can be exercised against an
//! in-memory fake.

use async_trait::async_trait;

use flotilla_model::{Labels, RegistrySettings};

use crate::{
    error::EngineResult,
    handle::{ContainerHandle, ContainerSpec, ImageSummary},
};

/// Operations the fleet needs from a container engine.
///
/// All calls go out to the engine and are bounded by a per-call timeout
/// at the adapter; the engine itself is the sole source of truth for
/// container state.
#[async_trait]
pub trait ContainerEngine: Send + Sync {
    /// Create and start a container. The image must already be present
    /// locally; resolving it is the caller's two-step inspect/pull
    /// sequence, kept separate so failure semantics stay distinguishable.
    async fn create_container(&self, spec: &ContainerSpec) -> EngineResult<ContainerHandle>;

    /// Pull an image from its registry.
    ///
    /// Fails with `ImageNotFound` (carrying the image reference) when the
    /// registry does not know the image; any other failure stays a
    /// transport error.
    async fn pull_image(&self, image: &str, auth: Option<&RegistrySettings>) -> EngineResult<()>;

    /// Inspect a locally available image; `ImageNotFound` when absent.
    async fn inspect_image(&self, image: &str) -> EngineResult<ImageSummary>;

    /// Find a container by exact name; `ContainerNotFound` when absent.
    async fn find_container(&self, name: &str) -> EngineResult<ContainerHandle>;

    /// List containers whose labels contain every entry of `filter`,
    /// regardless of run state. Always a fresh query.
    async fn list_containers(&self, filter: &Labels) -> EngineResult<Vec<ContainerHandle>>;

    /// Remove a container by name, killing it if still running.
    /// `ContainerNotFound` when it is already gone.
    async fn remove_container(&self, name: &str) -> EngineResult<()>;
}
