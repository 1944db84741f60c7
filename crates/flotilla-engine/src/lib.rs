mod error;
pub use error::{EngineError, EngineResult};

mod handle;
pub use handle::{ContainerHandle, ContainerSpec, ImageSummary};

mod engine;
pub use engine::ContainerEngine;

pub mod docker;
pub use docker::DockerEngine;
