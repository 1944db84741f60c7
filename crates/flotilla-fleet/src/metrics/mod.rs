//! Metrics collection abstraction for the fleet.
//!
//! This module provides a backend interface for counting provisioning
//! outcomes and reclamations. Metrics backends (prometheus etc) implement
//! [`MetricsBackend`] and are injected into the manager and reaper.
mod backend;
pub use backend::{CreateOutcome, MetricsBackend, MetricsHandle};

mod noop;
pub use noop::NoOpMetrics;

use std::sync::Arc;

/// Create a no-op metrics handle.
#[inline]
pub fn noop_metrics() -> MetricsHandle {
    Arc::new(NoOpMetrics)
}
