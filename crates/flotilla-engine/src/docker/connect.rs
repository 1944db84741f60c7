//! Endpoint dispatch for the Docker client.
//!
//! The settings carry TLS material as inline PEM strings; bollard wants
//! file paths, so the material is written into a per-process private
//! directory before connecting.

use std::fs;
use std::path::{Path, PathBuf};

use bollard::{API_DEFAULT_VERSION, Docker};

use flotilla_model::FleetSettings;

use crate::error::{EngineError, EngineResult};

const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Build a client for the configured endpoint.
///
/// Supported schemes: `unix://` sockets, plain `tcp://`/`http://`, and
/// `https://` with full TLS material present in the settings.
pub(super) fn client_for(settings: &FleetSettings) -> EngineResult<Docker> {
    let uri = settings.docker_uri.as_str();

    if let Some(path) = uri.strip_prefix("unix://") {
        return Docker::connect_with_socket(path, CONNECT_TIMEOUT_SECS, API_DEFAULT_VERSION)
            .map_err(|err| endpoint_error(uri, err));
    }

    if settings.uses_tls() {
        let dir = materialize_tls(settings)?;
        return Docker::connect_with_ssl(
            uri,
            &dir.join("key.pem"),
            &dir.join("cert.pem"),
            &dir.join("ca.pem"),
            CONNECT_TIMEOUT_SECS,
            API_DEFAULT_VERSION,
        )
        .map_err(|err| endpoint_error(uri, err));
    }

    if ["tcp://", "http://", "https://"]
        .iter()
        .any(|scheme| uri.starts_with(scheme))
    {
        return Docker::connect_with_http(uri, CONNECT_TIMEOUT_SECS, API_DEFAULT_VERSION)
            .map_err(|err| endpoint_error(uri, err));
    }

    Err(EngineError::InvalidEndpoint {
        uri: uri.to_string(),
        reason: "unsupported scheme, expected unix://, tcp:// or http(s)://".to_string(),
    })
}

/// Write the inline PEM material to owner-only files and return the
/// directory holding them. Re-running overwrites the previous material.
fn materialize_tls(settings: &FleetSettings) -> EngineResult<PathBuf> {
    let dir = std::env::temp_dir().join(format!("flotilla-engine-{}", std::process::id()));

    let write = |name: &str, pem: Option<&String>| -> EngineResult<()> {
        let pem = pem.ok_or_else(|| EngineError::InvalidEndpoint {
            uri: settings.docker_uri.clone(),
            reason: format!("missing TLS material for {name}"),
        })?;
        write_private(&dir.join(name), pem).map_err(|err| EngineError::InvalidEndpoint {
            uri: settings.docker_uri.clone(),
            reason: format!("cannot write {name}: {err}"),
        })
    };

    fs::create_dir_all(&dir).map_err(|err| EngineError::InvalidEndpoint {
        uri: settings.docker_uri.clone(),
        reason: format!("cannot create TLS directory: {err}"),
    })?;

    write("ca.pem", settings.ca_cert.as_ref())?;
    write("cert.pem", settings.client_cert.as_ref())?;
    write("key.pem", settings.client_key.as_ref())?;

    Ok(dir)
}

fn endpoint_error(uri: &str, err: bollard::errors::Error) -> EngineError {
    EngineError::InvalidEndpoint {
        uri: uri.to_string(),
        reason: err.to_string(),
    }
}

fn write_private(path: &Path, contents: &str) -> std::io::Result<()> {
    fs::write(path, contents)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }
    Ok(())
}
