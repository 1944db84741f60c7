use std::sync::Arc;

use prometheus::{Counter, CounterVec, Gauge, Opts, Registry, proto::MetricFamily};

use flotilla_fleet::metrics::{CreateOutcome, MetricsBackend};

/// Prometheus metrics backend for the fleet.
///
/// Implements [`MetricsBackend`] and exposes metrics that can be scraped
/// via an HTTP endpoint.
///
/// ## Metrics
/// - `flotilla_create_requests_total{environment, outcome}` - Counter of provisioning requests
/// - `flotilla_containers_terminated_total{reason}` - Counter of removals
/// - `flotilla_reap_failures_total` - Counter of failed reap attempts
/// - `flotilla_fleet_size` - Gauge of managed containers at the last engine query
///
/// ## Label cardinality
/// - `environment`: one value per configured CI environment (bounded by config)
/// - `outcome`: "created", "capacity_exceeded", "invalid_request", "image_not_found", "engine_failure"
/// - `reason`: "requested", "idle"
#[derive(Clone)]
pub struct PrometheusMetrics {
    create_requests: CounterVec,
    terminated: CounterVec,
    reap_failures: Counter,
    fleet_size: Gauge,
    registry: Arc<Registry>,
}

impl PrometheusMetrics {
    /// Create a new prometheus metrics backend with custom registry.
    pub fn new_with_registry(registry: Arc<Registry>) -> Result<Self, prometheus::Error> {
        let create_requests = CounterVec::new(
            Opts::new(
                "flotilla_create_requests_total",
                "Total number of worker provisioning requests",
            ),
            &["environment", "outcome"],
        )?;
        registry.register(Box::new(create_requests.clone()))?;

        let terminated = CounterVec::new(
            Opts::new(
                "flotilla_containers_terminated_total",
                "Total number of worker containers removed",
            ),
            &["reason"],
        )?;
        registry.register(Box::new(terminated.clone()))?;

        let reap_failures = Counter::new(
            "flotilla_reap_failures_total",
            "Total number of reap attempts that failed and will be retried",
        )?;
        registry.register(Box::new(reap_failures.clone()))?;

        let fleet_size = Gauge::new(
            "flotilla_fleet_size",
            "Managed containers observed by the latest engine query",
        )?;
        registry.register(Box::new(fleet_size.clone()))?;

        Ok(Self {
            create_requests,
            terminated,
            reap_failures,
            fleet_size,
            registry,
        })
    }

    /// Create a new prometheus metrics backend with default registry.
    pub fn new() -> Result<Self, prometheus::Error> {
        Self::new_with_registry(Arc::new(Registry::new()))
    }

    /// Gather all metrics for exposition.
    ///
    /// Use this to implement a `/metrics` HTTP endpoint.
    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }

    /// Get reference to underlying prometheus registry.
    ///
    /// Useful for registering custom metrics alongside fleet metrics.
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }
}

impl MetricsBackend for PrometheusMetrics {
    fn record_create(&self, environment: &str, outcome: CreateOutcome) {
        self.create_requests
            .with_label_values(&[environment, outcome.as_label()])
            .inc();
    }

    fn record_terminated(&self, reason: &'static str) {
        self.terminated.with_label_values(&[reason]).inc();
    }

    fn record_reap_failure(&self) {
        self.reap_failures.inc();
    }

    fn record_fleet_size(&self, size: usize) {
        self.fleet_size.set(size as f64);
    }
}
