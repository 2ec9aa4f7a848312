//! Shared state handed to every request handler.

use prometheus_client::{
    encoding::{EncodeLabelSet, EncodeLabelValue},
    metrics::{counter::Counter, family::Family},
    registry::Registry,
};

use crate::{config::Config, CostBreakdown, CostInputs};

/// Where an estimate request came from.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, EncodeLabelValue)]
pub enum EstimateSource {
    /// Typed JSON inputs.
    Json,
    /// Raw form text, coerced on the way in.
    Form,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
struct EstimateLabels {
    source: EstimateSource,
}

/// Metrics exported on `/metrics`.
#[derive(Debug)]
pub struct Metrics {
    registry: Registry,
    estimates: Family<EstimateLabels, Counter>,
}

impl Metrics {
    fn new() -> Self {
        let mut registry = Registry::default();
        let estimates = Family::<EstimateLabels, Counter>::default();
        registry.register("print_cost_estimates", "Cost estimates computed", estimates.clone());

        Self { registry, estimates }
    }

    /// Count one estimate.
    pub fn record(&self, source: EstimateSource) {
        self.estimates.get_or_create(&EstimateLabels { source }).inc();
    }

    /// Render in the OpenMetrics text format.
    pub fn encode(&self) -> Result<String, std::fmt::Error> {
        let mut out = String::new();
        prometheus_client::encoding::text::encode(&mut out, &self.registry)?;
        Ok(out)
    }
}

/**
 * Application-specific context (state shared by handler functions)
 */
pub struct Context {
    /// OpenAPI schema served on `/`.
    pub schema: serde_json::Value,

    /// Logger handed to dropshot.
    pub logger: slog::Logger,

    /// Currency, defaults, and bind address.
    pub config: Config,

    /// Request counters.
    pub metrics: Metrics,
}

impl Context {
    /**
     * Return a new Context.
     */
    pub fn new(schema: serde_json::Value, logger: slog::Logger, config: Config) -> Context {
        Context {
            schema,
            logger,
            config,
            metrics: Metrics::new(),
        }
    }

    /// Price `inputs`, counting the request against `source`.
    pub fn estimate(&self, inputs: &CostInputs, source: EstimateSource) -> CostBreakdown {
        let breakdown = inputs.compute();
        self.metrics.record(source);
        tracing::debug!(?source, total = breakdown.total_cost, "computed estimate");
        breakdown
    }
}
