//! Common model-level constants.
//!
//! Well-known string keys shared between the fleet manager, the engine
//! adapter and the daemon. Keeping them here avoids scattering magic
//! strings throughout the codebase.

/// Label stamped on every container this system creates.
///
/// Counting, matching and reaping only ever consider containers carrying
/// this label, so unrelated infrastructure containers are never touched.
pub const LABEL_MANAGED: &str = "flotilla.managed";

/// Value stored under [`LABEL_MANAGED`].
pub const LABEL_MANAGED_VALUE: &str = "true";

/// Label carrying the environment the worker was provisioned for.
pub const LABEL_ENVIRONMENT: &str = "flotilla.environment";

/// Label carrying the correlation key of the originating request.
pub const LABEL_REQUEST_KEY: &str = "flotilla.request-key";

/// Request property naming the container image. Mandatory.
pub const PROP_IMAGE: &str = "Image";

/// Optional request property with extra environment variables,
/// one `KEY=VALUE` entry per line.
pub const PROP_ENVIRONMENT: &str = "Environment";

/// CI server base URL the worker registers against.
pub const ENV_SERVER_URL: &str = "GO_SERVER_URL";

/// Auto-register key passed through from the request.
pub const ENV_AUTO_REGISTER_KEY: &str = "AGENT_AUTO_REGISTER_KEY";

/// Environment label passed through from the request.
pub const ENV_AUTO_REGISTER_ENVIRONMENT: &str = "AGENT_AUTO_REGISTER_ENVIRONMENT";

/// Auto-register timeout (minutes) from the validated settings.
pub const ENV_AUTO_REGISTER_TIMEOUT: &str = "AGENT_AUTO_REGISTER_TIMEOUT";
