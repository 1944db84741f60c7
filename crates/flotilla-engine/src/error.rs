use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// The image does not exist, locally or in the remote registry.
    /// Terminal for the current request; the message carries the image
    /// reference so the caller can report it verbatim.
    #[error("Image not found: {image}")]
    ImageNotFound { image: String },

    /// No container with the given name is known to the engine.
    #[error("container not found: {name}")]
    ContainerNotFound { name: String },

    /// A bounded engine call did not complete in time.
    #[error("engine call `{operation}` timed out after {timeout_secs}s")]
    Timeout {
        operation: &'static str,
        timeout_secs: u64,
    },

    /// The configured engine endpoint could not be used.
    #[error("invalid engine endpoint `{uri}`: {reason}")]
    InvalidEndpoint { uri: String, reason: String },

    /// Any other engine-level failure (network, permission, protocol).
    /// Never masked as one of the not-found variants.
    #[error("engine transport error: {0}")]
    Transport(#[from] bollard::errors::Error),
}

impl EngineError {
    /// Returns `true` for the engine's HTTP 404 response.
    ///
    /// Used at the adapter boundary to split not-found outcomes from
    /// genuine transport failures.
    pub(crate) fn is_not_found(err: &bollard::errors::Error) -> bool {
        matches!(
            err,
            bollard::errors::Error::DockerResponseServerError {
                status_code: 404,
                ..
            }
        )
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
