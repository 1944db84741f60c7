use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use flotilla_model::{Env, LABEL_ENVIRONMENT, Labels};

/// Everything the engine needs to create one worker container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSpec {
    /// Derived container name, unique per request.
    pub name: String,
    /// Image reference to run.
    pub image: String,
    /// Environment variables injected into the container.
    pub env: Env,
    /// Ownership labels used for matching and reaping.
    pub labels: Labels,
}

/// Reference to an engine-owned container.
///
/// The engine remains the sole source of truth; this value is only a
/// snapshot taken at query time and is never used as a durable registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerHandle {
    /// Engine-assigned identifier.
    pub id: String,
    /// Derived name the container was created under.
    pub name: String,
    /// When the engine created the container.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Environment label the worker was provisioned for, taken from the
    /// ownership labels; empty when the label is absent.
    pub environment: String,
}

impl ContainerHandle {
    /// Age of the container relative to `now`.
    ///
    /// Negative when the engine clock is ahead of ours; callers treat
    /// that as "not idle".
    pub fn age(&self, now: OffsetDateTime) -> Duration {
        now - self.created_at
    }

    /// Extract the environment label from a container's label set.
    pub fn environment_from(labels: &Labels) -> String {
        labels.get(LABEL_ENVIRONMENT).unwrap_or_default().to_string()
    }
}

/// Minimal image metadata returned by an inspect call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSummary {
    /// Engine-assigned image id (content digest).
    pub id: String,
}
