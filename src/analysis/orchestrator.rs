//! Fallback orchestrator
//!
//! Sequences model attempts for one analysis:
//!
//! - With a caller-supplied credential, exactly one attempt is made against
//!   the fallback model using that credential. It never falls through to the
//!   default identities.
//! - Otherwise the primary identity is tried first. Only a quota failure moves
//!   on to the fallback identity; any other failure ends the request.
//!
//! Attempts run strictly one after another. Credentials travel inside each
//! [`ModelIdentity`], so a custom key never touches shared state.

use crate::analysis::assembler::{self, AnalysisEnvelope};
use crate::analysis::extractor;
use crate::error::OrchestratorError;
use crate::metrics::{AnalysisOutcome, Metrics, Stage};
use crate::models::{
    Credential, FailureKind, InvocationOutcome, InvocationRequest, ModelIdentity, ModelInvoker,
};
use std::borrow::Cow;
use std::sync::Arc;
use std::time::Instant;

/// Input of one analysis
#[derive(Debug, Clone)]
pub struct AnalysisJob {
    pub idea: String,
    pub industry: String,
    pub extra_context: String,
}

impl AnalysisJob {
    pub fn new(
        idea: impl Into<String>,
        industry: impl Into<String>,
        extra_context: impl Into<String>,
    ) -> Self {
        Self {
            idea: idea.into(),
            industry: industry.into(),
            extra_context: extra_context.into(),
        }
    }

    /// Render the outbound prompt for this job
    pub fn prompt(&self) -> String {
        assembler::build_prompt(&self.idea, &self.industry, &self.extra_context)
    }
}

/// Raw text of a successful attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub text: String,
    pub model: String,
    pub stage: Stage,
}

/// Sequences attempts across the primary, fallback and custom identities
pub struct FallbackOrchestrator {
    invoker: ModelInvoker,
    primary: ModelIdentity,
    fallback: ModelIdentity,
    metrics: Arc<Metrics>,
}

impl FallbackOrchestrator {
    pub fn new(
        invoker: ModelInvoker,
        primary: ModelIdentity,
        fallback: ModelIdentity,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            invoker,
            primary,
            fallback,
            metrics,
        }
    }

    /// Primary identity (carries the process default credential)
    pub fn primary(&self) -> &ModelIdentity {
        &self.primary
    }

    /// Fallback identity (carries the process default credential)
    pub fn fallback(&self) -> &ModelIdentity {
        &self.fallback
    }

    fn identity_for<'a>(
        &'a self,
        stage: Stage,
        custom: Option<&Credential>,
    ) -> Cow<'a, ModelIdentity> {
        match (stage, custom) {
            (Stage::Custom, Some(credential)) => {
                Cow::Owned(self.fallback.with_credential(credential.clone()))
            }
            (Stage::Primary, _) => Cow::Borrowed(&self.primary),
            (Stage::Custom, None) | (Stage::Fallback, _) => Cow::Borrowed(&self.fallback),
        }
    }

    async fn attempt(&self, stage: Stage, identity: &ModelIdentity, prompt: &str) -> InvocationOutcome {
        tracing::info!(
            stage = stage.as_str(),
            model = %identity.name(),
            "Invoking analyst model"
        );

        let started = Instant::now();
        let outcome = self
            .invoker
            .invoke(InvocationRequest::new(prompt, identity))
            .await;
        let duration_ms = started.elapsed().as_secs_f64() * 1000.0;

        if let Err(e) = self
            .metrics
            .record_invocation(stage, outcome.label(), duration_ms)
        {
            tracing::warn!(
                stage = stage.as_str(),
                error = %e,
                "Failed to record invocation metrics"
            );
        }

        outcome
    }

    /// Run the attempt sequence and return the raw text of the first success
    ///
    /// # Errors
    ///
    /// - [`OrchestratorError::AllCredentialsExhausted`] when the custom
    ///   credential hits its quota
    /// - [`OrchestratorError::AllModelsExhausted`] when primary and fallback
    ///   both hit their quota
    /// - [`OrchestratorError::ExecutionFailed`] for any other failure
    pub async fn complete(
        &self,
        prompt: &str,
        custom: Option<&Credential>,
    ) -> Result<Completion, OrchestratorError> {
        let mut stage = if custom.is_some() {
            Stage::Custom
        } else {
            Stage::Primary
        };

        loop {
            let identity = self.identity_for(stage, custom);

            match self.attempt(stage, &identity, prompt).await {
                InvocationOutcome::Success { text } => {
                    tracing::info!(
                        stage = stage.as_str(),
                        model = %identity.name(),
                        "Analyst model succeeded"
                    );
                    return Ok(Completion {
                        text,
                        model: identity.name().to_string(),
                        stage,
                    });
                }
                InvocationOutcome::Failure {
                    kind: FailureKind::QuotaExhausted,
                    ..
                } => match stage {
                    Stage::Custom => {
                        tracing::warn!(
                            model = %identity.name(),
                            "Quota exceeded on supplied API key, no fallback for custom credentials"
                        );
                        return Err(OrchestratorError::AllCredentialsExhausted);
                    }
                    Stage::Primary => {
                        tracing::warn!(
                            primary = %self.primary.name(),
                            fallback = %self.fallback.name(),
                            "Quota exceeded on primary model, switching to fallback"
                        );
                        self.metrics.record_fallback();
                        stage = Stage::Fallback;
                    }
                    Stage::Fallback => {
                        tracing::warn!(
                            model = %identity.name(),
                            "Quota exceeded on fallback model as well"
                        );
                        return Err(OrchestratorError::AllModelsExhausted);
                    }
                },
                InvocationOutcome::Failure { kind, detail } => {
                    tracing::error!(
                        stage = stage.as_str(),
                        model = %identity.name(),
                        failure_kind = kind.as_str(),
                        detail = %detail,
                        "Analyst model failed, not falling back"
                    );
                    return Err(OrchestratorError::ExecutionFailed {
                        model: identity.name().to_string(),
                        detail,
                    });
                }
            }
        }
    }

    /// Run one analysis end to end
    ///
    /// Once a model call succeeds the result is always `Ok`: unparseable
    /// output degrades to the placeholder report.
    pub async fn run(
        &self,
        job: &AnalysisJob,
        custom: Option<&Credential>,
    ) -> Result<AnalysisEnvelope, OrchestratorError> {
        let prompt = job.prompt();

        let result = self.complete(&prompt, custom).await.map(|completion| {
            assembler::assemble(
                &job.idea,
                &job.industry,
                extractor::extract(&completion.text),
            )
        });

        let outcome = match &result {
            Ok(envelope) if envelope.is_degraded() => AnalysisOutcome::Degraded,
            Ok(_) => AnalysisOutcome::Success,
            Err(e) if e.is_quota() => AnalysisOutcome::QuotaExhausted,
            Err(_) => AnalysisOutcome::ExecutionFailed,
        };
        if let Err(e) = self.metrics.record_analysis(outcome) {
            tracing::warn!(error = %e, "Failed to record analysis metrics");
        }

        result
    }
}
