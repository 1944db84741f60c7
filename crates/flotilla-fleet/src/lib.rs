pub mod capacity;
pub mod error;
pub mod identity;
pub mod manager;
pub mod metrics;
pub mod reaper;

#[cfg(test)]
mod test_support;

pub mod prelude {
    pub use crate::error::{FleetError, FleetResult};
    pub use crate::manager::FleetManager;
    pub use crate::metrics::{CreateOutcome, MetricsBackend, MetricsHandle, noop_metrics};
    pub use crate::reaper::{IdleReaper, ReapReport};
}
