//! # Prometheus Metrics
//!
//! Operational metrics for the registry node, scraped at `/metrics` on the
//! metrics port.
//!
//! All metrics live in a dedicated [`prometheus::Registry`] with the
//! `starchain` prefix so they do not collide with the default global one.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};
use std::sync::Arc;

/// Metric handles for the node. Prometheus handles are internally
/// reference-counted, so clones share the same series.
#[derive(Clone)]
pub struct NodeMetrics {
    registry: Registry,
    /// Blocks appended to the chain by accepted star submissions.
    pub blocks_appended_total: IntCounter,
    /// Submissions rejected, labelled by `reason`.
    pub proofs_rejected_total: IntCounterVec,
    /// Current chain height.
    pub chain_height: IntGauge,
    /// Issue count from the most recent chain audit.
    pub validation_issues: IntGauge,
}

impl NodeMetrics {
    /// Creates and registers all metrics. Call once at startup.
    pub fn new() -> Self {
        let registry = Registry::new_custom(Some("starchain".into()), None)
            .expect("failed to create prometheus registry");

        let blocks_appended_total = IntCounter::new(
            "blocks_appended_total",
            "Total number of blocks appended by accepted star submissions",
        )
        .expect("metric creation");
        registry
            .register(Box::new(blocks_appended_total.clone()))
            .expect("metric registration");

        let proofs_rejected_total = IntCounterVec::new(
            Opts::new(
                "proofs_rejected_total",
                "Total number of rejected star submissions by reason",
            ),
            &["reason"],
        )
        .expect("metric creation");
        registry
            .register(Box::new(proofs_rejected_total.clone()))
            .expect("metric registration");

        let chain_height = IntGauge::new("chain_height", "Height of the latest block")
            .expect("metric creation");
        registry
            .register(Box::new(chain_height.clone()))
            .expect("metric registration");

        let validation_issues = IntGauge::new(
            "validation_issues",
            "Number of issues reported by the most recent chain audit",
        )
        .expect("metric creation");
        registry
            .register(Box::new(validation_issues.clone()))
            .expect("metric registration");

        Self {
            registry,
            blocks_appended_total,
            proofs_rejected_total,
            chain_height,
            validation_issues,
        }
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

impl Default for NodeMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared metrics state passed to axum handlers.
pub type SharedMetrics = Arc<NodeMetrics>;

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
