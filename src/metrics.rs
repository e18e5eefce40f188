//! Prometheus metrics collection for FoundersLens
//!
//! This module provides metrics instrumentation for tracking:
//! - Analysis outcomes (success, degraded, quota exhausted, execution failed)
//! - Model invocations by orchestration stage and outcome
//! - Invocation latency by stage
//! - Primary-to-fallback transitions
//!
//! Metrics are exposed via the `/metrics` endpoint in Prometheus text format.

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

/// Orchestration stage enum for type-safe metrics labels
///
/// Custom-credential attempts are labelled separately so operator dashboards
/// can tell caller-funded traffic apart from the default key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Custom,
    Primary,
    Fallback,
}

impl Stage {
    /// Convert stage to Prometheus label string
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Custom => "custom",
            Stage::Primary => "primary",
            Stage::Fallback => "fallback",
        }
    }
}

/// Final outcome of one analysis request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisOutcome {
    /// Model output parsed into a report
    Success,
    /// Model call succeeded but the placeholder report was returned
    Degraded,
    QuotaExhausted,
    ExecutionFailed,
}

impl AnalysisOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisOutcome::Success => "success",
            AnalysisOutcome::Degraded => "degraded",
            AnalysisOutcome::QuotaExhausted => "quota_exhausted",
            AnalysisOutcome::ExecutionFailed => "execution_failed",
        }
    }
}

/// Metrics collector for FoundersLens
#[derive(Clone)]
pub struct Metrics {
    pub registry: Arc<Registry>,
    analyses_total: IntCounterVec,
    model_invocations: IntCounterVec,
    invocation_duration: HistogramVec,
    fallbacks_total: IntCounter,
}

impl Metrics {
    /// Create a new Metrics instance
    ///
    /// Registers all metrics with a new Prometheus registry.
    ///
    /// # Errors
    ///
    /// Returns an error if metric registration fails (e.g., duplicate names).
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        // Cardinality: 4 outcomes
        let analyses_total = IntCounterVec::new(
            Opts::new(
                "founderslens_analyses_total",
                "Total number of analysis requests by final outcome",
            ),
            &["outcome"],
        )?;

        // Cardinality: 3 stages × 4 outcomes = 12 time series
        let model_invocations = IntCounterVec::new(
            Opts::new(
                "founderslens_model_invocations_total",
                "Total model invocations by orchestration stage and outcome",
            ),
            &["stage", "outcome"],
        )?;

        // Model calls for a full report take seconds, not milliseconds
        let invocation_duration = HistogramVec::new(
            HistogramOpts::new(
                "founderslens_invocation_duration_ms",
                "Model invocation latency in milliseconds",
            )
            .buckets(vec![
                100.0, 500.0, 1000.0, 2500.0, 5000.0, 10000.0, 30000.0, 60000.0, 120000.0,
            ]),
            &["stage"],
        )?;

        let fallbacks_total = IntCounter::with_opts(Opts::new(
            "founderslens_fallbacks_total",
            "Total number of primary-to-fallback transitions after quota exhaustion",
        ))?;

        registry.register(Box::new(analyses_total.clone()))?;
        registry.register(Box::new(model_invocations.clone()))?;
        registry.register(Box::new(invocation_duration.clone()))?;
        registry.register(Box::new(fallbacks_total.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            analyses_total,
            model_invocations,
            invocation_duration,
            fallbacks_total,
        })
    }

    /// Record the final outcome of an analysis request
    ///
    /// # Errors
    ///
    /// Returns an error if the metric is not registered.
    pub fn record_analysis(&self, outcome: AnalysisOutcome) -> Result<(), prometheus::Error> {
        self.analyses_total
            .get_metric_with_label_values(&[outcome.as_str()])?
            .inc();
        Ok(())
    }

    /// Record one model invocation and its latency
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The metric is not registered
    /// - `duration_ms` is NaN, infinite, or negative
    pub fn record_invocation(
        &self,
        stage: Stage,
        outcome: &'static str,
        duration_ms: f64,
    ) -> Result<(), prometheus::Error> {
        if !duration_ms.is_finite() || duration_ms < 0.0 {
            return Err(prometheus::Error::Msg(format!(
                "Histogram value must be finite and non-negative, got: {}",
                duration_ms
            )));
        }

        self.model_invocations
            .get_metric_with_label_values(&[stage.as_str(), outcome])?
            .inc();
        self.invocation_duration
            .get_metric_with_label_values(&[stage.as_str()])?
            .observe(duration_ms);
        Ok(())
    }

    /// Record a primary-to-fallback transition
    pub fn record_fallback(&self) {
        self.fallbacks_total.inc();
    }

    /// Number of fallback transitions since startup
    pub fn fallbacks_count(&self) -> u64 {
        self.fallbacks_total.get()
    }

    /// Current count for one analysis outcome
    pub fn analyses_count(&self, outcome: AnalysisOutcome) -> u64 {
        self.analyses_total
            .get_metric_with_label_values(&[outcome.as_str()])
            .map(|c| c.get())
            .unwrap_or(0)
    }

    /// Gather all metrics in Prometheus text format
    ///
    /// # Errors
    ///
    /// Returns an error if metric encoding fails.
    pub fn gather(&self) -> Result<String, prometheus::Error> {
        let metric_families = self.registry.gather();

        tracing::debug!(
            metric_family_count = metric_families.len(),
            "Encoding metrics to Prometheus text format"
        );

        let mut buffer = Vec::new();
        TextEncoder::new().encode(&metric_families, &mut buffer)?;

        String::from_utf8(buffer).map_err(|e| {
            prometheus::Error::Msg(format!(
                "Failed to convert metrics to UTF-8 at byte {}: {}",
                e.utf8_error().valid_up_to(),
                e
            ))
        })
    }
}
