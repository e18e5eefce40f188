//! HTTP request handlers for the FoundersLens API

use crate::analysis::FallbackOrchestrator;
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::metrics::Metrics;
use crate::middleware::request_id_middleware;
use crate::models::{Credential, ModelBackend, ModelInvoker};
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod analyze;
pub mod health;
pub mod metrics;

/// Application state shared across all handlers
///
/// Contains configuration, the fallback orchestrator and metrics.
/// All fields are Arc'd for cheap cloning across Axum handlers. Nothing in
/// here is mutated per request; custom credentials travel with the request.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    orchestrator: Arc<FallbackOrchestrator>,
    metrics: Arc<Metrics>,
}

impl AppState {
    /// Create a new AppState
    ///
    /// `credential` is the process default, bound to both the primary and the
    /// fallback identity.
    pub fn new(
        config: Arc<Config>,
        backend: Arc<dyn ModelBackend>,
        credential: Credential,
    ) -> AppResult<Self> {
        let metrics = Arc::new(
            Metrics::new()
                .map_err(|e| AppError::Internal(format!("Failed to create metrics: {}", e)))?,
        );

        let primary = config.models.primary_identity(credential.clone())?;
        let fallback = config.models.fallback_identity(credential)?;
        let orchestrator = Arc::new(FallbackOrchestrator::new(
            ModelInvoker::new(backend),
            primary,
            fallback,
            metrics.clone(),
        ));

        Ok(Self {
            config,
            orchestrator,
            metrics,
        })
    }

    /// Get reference to the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get reference to the fallback orchestrator
    pub fn orchestrator(&self) -> &FallbackOrchestrator {
        &self.orchestrator
    }

    /// Get reference to the metrics collector
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }
}

/// Build the HTTP router with all routes and middleware
///
/// CORS is permissive: the browser front end is served from another origin.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::handler))
        .route("/analyze", post(analyze::handler))
        .route("/metrics", get(metrics::handler))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
