//! Plugin settings: raw key validation and the typed, immutable form.
//!
//! Validation is a pure pass over the raw key/value mapping; it never
//! performs I/O and never panics on malformed numeric input. The error
//! order follows field-check order, not severity.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::Flag;

pub const KEY_GO_SERVER_URL: &str = "go_server_url";
pub const KEY_MAX_CONTAINERS: &str = "max_docker_containers";
pub const KEY_DOCKER_URI: &str = "docker_uri";
pub const KEY_DOCKER_CA_CERT: &str = "docker_ca_cert";
pub const KEY_DOCKER_CLIENT_KEY: &str = "docker_client_key";
pub const KEY_DOCKER_CLIENT_CERT: &str = "docker_client_cert";
pub const KEY_AUTO_REGISTER_TIMEOUT: &str = "auto_register_timeout";
pub const KEY_USE_PRIVATE_REGISTRY: &str = "enable_private_registry_authentication";
pub const KEY_PRIVATE_REGISTRY_SERVER: &str = "private_registry_server";
pub const KEY_PRIVATE_REGISTRY_USERNAME: &str = "private_registry_username";
pub const KEY_PRIVATE_REGISTRY_PASSWORD: &str = "private_registry_password";

/// Every recognized settings key, in validation order.
pub const SETTINGS_KEYS: [&str; 11] = [
    KEY_GO_SERVER_URL,
    KEY_MAX_CONTAINERS,
    KEY_DOCKER_URI,
    KEY_DOCKER_CA_CERT,
    KEY_DOCKER_CLIENT_KEY,
    KEY_DOCKER_CLIENT_CERT,
    KEY_AUTO_REGISTER_TIMEOUT,
    KEY_USE_PRIVATE_REGISTRY,
    KEY_PRIVATE_REGISTRY_SERVER,
    KEY_PRIVATE_REGISTRY_USERNAME,
    KEY_PRIVATE_REGISTRY_PASSWORD,
];

/// A single validation finding for one settings key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Settings key the finding refers to.
    pub key: String,
    /// Human-readable message.
    pub message: String,
}

impl ValidationError {
    fn new(key: &str, message: impl Into<String>) -> Self {
        Self {
            key: key.to_string(),
            message: message.into(),
        }
    }
}

/// Private registry credentials; all three fields are required together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrySettings {
    pub server: String,
    pub username: String,
    pub password: String,
}

/// Validated, immutable plugin configuration.
///
/// Constructed once per configuration change via [`FleetSettings::from_raw`]
/// and only ever re-read afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FleetSettings {
    /// CI server base URL injected into every worker.
    pub go_server_url: String,
    /// Container engine endpoint (unix socket, http or https).
    pub docker_uri: String,
    /// TLS material for the engine connection, PEM-encoded.
    pub ca_cert: Option<String>,
    pub client_cert: Option<String>,
    pub client_key: Option<String>,
    /// Maximum number of concurrently managed containers.
    pub max_containers: usize,
    /// Minutes before an unregistered/idle worker is reclaimed.
    pub auto_register_timeout_minutes: u64,
    /// Credentials for a private image registry, when enabled.
    pub registry: Option<RegistrySettings>,
}

impl FleetSettings {
    /// Validate `raw` and build the typed settings.
    ///
    /// Returns the complete list of validation findings when anything is
    /// off; never a partially populated value.
    pub fn from_raw(raw: &BTreeMap<String, String>) -> Result<Self, Vec<ValidationError>> {
        let errors = validate(raw);
        if !errors.is_empty() {
            return Err(errors);
        }

        // validate() guarantees presence and format of everything below.
        let get = |key: &str| raw.get(key).map(|s| s.trim().to_string()).unwrap_or_default();
        let opt = |key: &str| raw.get(key).map(|s| s.trim()).filter(|s| !s.is_empty()).map(str::to_string);

        let use_registry = raw
            .get(KEY_USE_PRIVATE_REGISTRY)
            .and_then(|v| v.parse::<Flag>().ok())
            .unwrap_or_default();

        let registry = if use_registry.is_enabled() {
            Some(RegistrySettings {
                server: get(KEY_PRIVATE_REGISTRY_SERVER),
                username: get(KEY_PRIVATE_REGISTRY_USERNAME),
                password: get(KEY_PRIVATE_REGISTRY_PASSWORD),
            })
        } else {
            None
        };

        Ok(Self {
            go_server_url: get(KEY_GO_SERVER_URL),
            docker_uri: get(KEY_DOCKER_URI),
            ca_cert: opt(KEY_DOCKER_CA_CERT),
            client_cert: opt(KEY_DOCKER_CLIENT_CERT),
            client_key: opt(KEY_DOCKER_CLIENT_KEY),
            max_containers: positive_integer(raw, KEY_MAX_CONTAINERS).unwrap_or(1) as usize,
            auto_register_timeout_minutes: positive_integer(raw, KEY_AUTO_REGISTER_TIMEOUT)
                .unwrap_or(10),
            registry,
        })
    }

    /// Engine connection uses TLS when the full material is present.
    pub fn uses_tls(&self) -> bool {
        self.ca_cert.is_some() && self.client_cert.is_some() && self.client_key.is_some()
    }
}

/// Validate raw settings key/value pairs.
///
/// Returns an empty list when the configuration is fully valid. Checks
/// run in field order; numeric-format failures are reported under the
/// offending key instead of being propagated.
pub fn validate(raw: &BTreeMap<String, String>) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if is_blank(raw, KEY_GO_SERVER_URL) {
        errors.push(ValidationError::new(
            KEY_GO_SERVER_URL,
            "Go Server URL must not be blank.",
        ));
    }

    if positive_integer(raw, KEY_MAX_CONTAINERS).is_none() {
        errors.push(ValidationError::new(
            KEY_MAX_CONTAINERS,
            "Maximum containers to allow must be a positive integer.",
        ));
    }

    if is_blank(raw, KEY_DOCKER_URI) {
        errors.push(ValidationError::new(
            KEY_DOCKER_URI,
            "Docker URI must not be blank.",
        ));
    }

    if positive_integer(raw, KEY_AUTO_REGISTER_TIMEOUT).is_none() {
        errors.push(ValidationError::new(
            KEY_AUTO_REGISTER_TIMEOUT,
            "Agent auto-register Timeout (in minutes) must be a positive integer.",
        ));
    }

    match raw
        .get(KEY_USE_PRIVATE_REGISTRY)
        .map(|v| v.parse::<Flag>())
    {
        Some(Ok(flag)) => {
            if flag.is_enabled() {
                for (key, display) in [
                    (KEY_PRIVATE_REGISTRY_SERVER, "Private Registry Server"),
                    (KEY_PRIVATE_REGISTRY_USERNAME, "Private Registry Username"),
                    (KEY_PRIVATE_REGISTRY_PASSWORD, "Private Registry Password"),
                ] {
                    if is_blank(raw, key) {
                        errors.push(ValidationError::new(
                            key,
                            format!("{display} must not be blank."),
                        ));
                    }
                }
            }
        }
        Some(Err(_)) | None => {
            errors.push(ValidationError::new(
                KEY_USE_PRIVATE_REGISTRY,
                "Use Private Registry must not be blank.",
            ));
        }
    }

    errors
}

fn is_blank(raw: &BTreeMap<String, String>, key: &str) -> bool {
    raw.get(key).map(|v| v.trim().is_empty()).unwrap_or(true)
}

/// Parse a strictly positive integer; `None` covers absent, malformed
/// and non-positive values alike.
fn positive_integer(raw: &BTreeMap<String, String>, key: &str) -> Option<u64> {
    raw.get(key)
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|n| *n > 0)
}
