use thiserror::Error;

use flotilla_engine::EngineError;
use flotilla_model::ModelError;

#[derive(Debug, Error)]
pub enum FleetError {
    /// The request itself is unusable (missing or malformed attribute).
    /// Raised before any engine call is made.
    #[error("{0}")]
    Configuration(String),

    /// Creation refused because the managed-container limit is reached.
    #[error("the number of containers ({current}) is already at the configured maximum ({limit})")]
    CapacityExceeded { current: usize, limit: usize },

    /// Failure reported by the container engine.
    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl From<ModelError> for FleetError {
    fn from(err: ModelError) -> Self {
        FleetError::Configuration(err.to_string())
    }
}

pub type FleetResult<T> = Result<T, FleetError>;
