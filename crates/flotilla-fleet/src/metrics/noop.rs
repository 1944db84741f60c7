use crate::metrics::backend::{CreateOutcome, MetricsBackend};

/// No-op metrics backend that compiles to nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpMetrics;

impl MetricsBackend for NoOpMetrics {
    #[inline(always)]
    fn record_create(&self, _: &str, _: CreateOutcome) {}

    #[inline(always)]
    fn record_terminated(&self, _: &'static str) {}

    #[inline(always)]
    fn record_reap_failure(&self) {}

    #[inline(always)]
    fn record_fleet_size(&self, _: usize) {}
}
