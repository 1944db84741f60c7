//! Prometheus metrics backend for the container fleet.
//!
//! This crate provides a [`PrometheusMetrics`] implementation of
//! [`flotilla_fleet::metrics::MetricsBackend`] that exposes fleet metrics
//! in Prometheus format.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use flotilla_prometheus::PrometheusMetrics;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let metrics = PrometheusMetrics::new()?;
//! let handle = Arc::new(metrics.clone());
//! // Pass `handle` to FleetManager::with_metrics(..).
//!
//! // Expose /metrics (example with custom HTTP server)
//! // let families = metrics.gather();
//! // let encoder = prometheus::TextEncoder::new();
//! // encoder.encode(&families, &mut response_buffer)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Metrics
//! - `flotilla_create_requests_total{environment, outcome}` - Counter
//! - `flotilla_containers_terminated_total{reason}` - Counter
//! - `flotilla_reap_failures_total` - Counter
//! - `flotilla_fleet_size` - Gauge
//!
//! ## HTTP Server
//! This crate does NOT provide an HTTP server for the `/metrics`
//! endpoint; use the application's existing HTTP framework and call
//! [`PrometheusMetrics::gather`].

mod backend;
pub use backend::PrometheusMetrics;

pub use prometheus::{Encoder, Registry, TextEncoder};
