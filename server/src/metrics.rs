//! # Prometheus Metrics
//!
//! Operational counters for the vault backend, scraped at `/metrics` on the
//! optional metrics port.
//!
//! All metrics are registered in a dedicated [`prometheus::Registry`] with the
//! `vault` namespace so they do not collide with any default global registry
//! consumers.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use prometheus::{Encoder, IntCounter, IntGauge, Registry, TextEncoder};
use std::sync::Arc;

/// Holds all Prometheus metric handles for the backend.
#[derive(Clone)]
pub struct VaultMetrics {
    /// Prometheus registry that owns all metrics below.
    registry: Registry,
    /// Number of items currently held in the collection.
    pub items_stored: IntGauge,
    /// Successful add/delete/edit/save calls.
    pub mutations_total: IntCounter,
    /// Mutations rolled back because the persistence file could not be written.
    pub persistence_failures_total: IntCounter,
    /// Requests rejected with 400 for a body that did not bind.
    pub rejected_requests_total: IntCounter,
}

impl VaultMetrics {
    /// Creates and registers all metrics. Call once at startup.
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new_custom(Some("vault".into()), None)?;

        let items_stored = IntGauge::new("items_stored", "Number of items currently stored")?;
        registry.register(Box::new(items_stored.clone()))?;

        let mutations_total = IntCounter::new(
            "mutations_total",
            "Total number of successful store mutations",
        )?;
        registry.register(Box::new(mutations_total.clone()))?;

        let persistence_failures_total = IntCounter::new(
            "persistence_failures_total",
            "Total number of mutations rolled back on a failed file write",
        )?;
        registry.register(Box::new(persistence_failures_total.clone()))?;

        let rejected_requests_total = IntCounter::new(
            "rejected_requests_total",
            "Total number of requests rejected for an invalid body",
        )?;
        registry.register(Box::new(rejected_requests_total.clone()))?;

        Ok(Self {
            registry,
            items_stored,
            mutations_total,
            persistence_failures_total,
            rejected_requests_total,
        })
    }

    /// Records a successful mutation and the collection size after it.
    pub fn record_mutation(&self, items: usize) {
        self.mutations_total.inc();
        self.items_stored.set(items as i64);
    }

    /// Encodes all registered metrics into the Prometheus text exposition format.
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

/// Shared metrics state passed to axum handlers.
pub type SharedMetrics = Arc<VaultMetrics>;

/// Axum handler that renders `/metrics` in Prometheus text format.
pub async fn metrics_handler(
    axum::extract::State(metrics): axum::extract::State<SharedMetrics>,
) -> impl IntoResponse {
    match metrics.encode() {
        Ok(body) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("failed to encode metrics: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "metrics encoding failed").into_response()
        }
    }
}
