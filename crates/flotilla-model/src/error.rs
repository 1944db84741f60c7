use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Must provide `Image` attribute.")]
    MissingImage,

    #[error("unrecognized boolean value: {0}")]
    InvalidFlag(String),
}

pub type ModelResult<T> = Result<T, ModelError>;
