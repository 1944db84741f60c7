mod domain;
pub use domain::{Env, Flag, KeyValue, Labels};
pub use domain::{
    ENV_AUTO_REGISTER_ENVIRONMENT, ENV_AUTO_REGISTER_KEY, ENV_AUTO_REGISTER_TIMEOUT,
    ENV_SERVER_URL, LABEL_ENVIRONMENT, LABEL_MANAGED, LABEL_MANAGED_VALUE, LABEL_REQUEST_KEY,
    PROP_ENVIRONMENT, PROP_IMAGE,
};

mod error;
pub use error::{ModelError, ModelResult};

mod request;
pub use request::AgentRequest;

mod settings;
pub use settings::{FleetSettings, RegistrySettings, ValidationError, validate};
pub use settings::{
    KEY_AUTO_REGISTER_TIMEOUT, KEY_DOCKER_CA_CERT, KEY_DOCKER_CLIENT_CERT, KEY_DOCKER_CLIENT_KEY,
    KEY_DOCKER_URI, KEY_GO_SERVER_URL, KEY_MAX_CONTAINERS, KEY_PRIVATE_REGISTRY_PASSWORD,
    KEY_PRIVATE_REGISTRY_SERVER, KEY_PRIVATE_REGISTRY_USERNAME, KEY_USE_PRIVATE_REGISTRY,
    SETTINGS_KEYS,
};
