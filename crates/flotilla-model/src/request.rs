use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    Env, PROP_ENVIRONMENT, PROP_IMAGE,
    error::{ModelError, ModelResult},
};

/// A request from the build scheduler to provision one worker container.
///
/// Consumed once; it carries everything the fleet manager needs to decide
/// whether and how to create a container. The `Image` property is
/// mandatory — its absence is a configuration error, not a transient
/// failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentRequest {
    /// Opaque correlation key handed back to the CI server so the worker
    /// can be matched to the build that asked for it.
    auto_register_key: String,
    /// Free-form properties; must include `Image`, may include
    /// `Environment` with extra `KEY=VALUE` lines.
    #[serde(default)]
    properties: BTreeMap<String, String>,
    /// Environment label (e.g. `production`) the worker belongs to.
    environment: String,
}

impl AgentRequest {
    /// Create a new request.
    pub fn new<K, E>(auto_register_key: K, properties: BTreeMap<String, String>, environment: E) -> Self
    where
        K: Into<String>,
        E: Into<String>,
    {
        Self {
            auto_register_key: auto_register_key.into(),
            properties,
            environment: environment.into(),
        }
    }

    /// The correlation key.
    pub fn key(&self) -> &str {
        &self.auto_register_key
    }

    /// The environment label.
    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// Look up a raw property.
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(|s| s.as_str())
    }

    /// The container image to run.
    ///
    /// Fails with [`ModelError::MissingImage`] when the property is
    /// absent or blank; this is checked before any engine call is made.
    pub fn image(&self) -> ModelResult<&str> {
        self.property(PROP_IMAGE)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(ModelError::MissingImage)
    }

    /// Extra environment variables supplied with the request, parsed from
    /// the optional `Environment` property.
    pub fn extra_env(&self) -> Env {
        self.property(PROP_ENVIRONMENT)
            .map(Env::parse_lines)
            .unwrap_or_default()
    }
}
