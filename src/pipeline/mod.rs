//! Per-request orchestration: compose → sanitize → enhance.
//! Strictly sequential; the enhancement call never goes out before
//! sanitization completes. No shared mutable state between requests.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::composer::Composer;
use crate::enhancer::{Enhance, EnhancerError};
use crate::sanitizer::{IssueCategory, SanitizationResult, Sanitizer, SanitizerError};
use crate::session::SessionContext;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Sanitizer construction failed: {0}")]
    Sanitizer(#[from] SanitizerError),
    #[error("Session expired at {0}")]
    SessionExpired(DateTime<Utc>),
    #[error("All prompt fields are empty")]
    EmptyPrompt,
    #[error("Enhancement failed: {0}")]
    Enhancement(#[from] EnhancerError),
}

/// The four authoring fields as submitted by the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptRequest {
    pub goal: String,
    pub return_format: String,
    pub warnings: String,
    pub context: String,
}

impl PromptRequest {
    pub fn is_empty(&self) -> bool {
        self.goal.is_empty()
            && self.return_format.is_empty()
            && self.warnings.is_empty()
            && self.context.is_empty()
    }
}

/// Composed and sanitized prompt, before any network traffic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreparedPrompt {
    pub composed: String,
    pub sanitized: SanitizationResult,
}

/// Everything the caller renders after one submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptArtifacts {
    pub composed: String,
    pub sanitized: String,
    pub issues: HashMap<IssueCategory, String>,
    pub enhanced: String,
}

pub struct PromptPipeline<E: Enhance> {
    sanitizer: Sanitizer,
    enhancer: E,
}

impl<E: Enhance> PromptPipeline<E> {
    pub fn new(enhancer: E) -> Result<Self, PipelineError> {
        Ok(Self {
            sanitizer: Sanitizer::new()?,
            enhancer,
        })
    }

    /// Composes and sanitizes without touching the network. Callers that
    /// must keep their prompt even when the rewriting service is down use
    /// this and call the enhancer themselves.
    pub fn prepare(&self, request: &PromptRequest) -> PreparedPrompt {
        let composed = Composer::compose(
            &request.goal,
            &request.return_format,
            &request.warnings,
            &request.context,
        );
        let sanitized = self.sanitizer.sanitize(&composed);

        PreparedPrompt {
            composed,
            sanitized,
        }
    }

    /// Runs the full round trip. An enhancement failure fails the request;
    /// the advisory sanitization issues never do.
    #[instrument(skip(self, request))]
    pub async fn process(&self, request: &PromptRequest) -> Result<PromptArtifacts, PipelineError> {
        let prepared = self.prepare(request);

        if prepared.sanitized.text.is_empty() {
            return Err(PipelineError::EmptyPrompt);
        }

        for (category, message) in &prepared.sanitized.issues {
            warn!(category = ?category, message = %message, "Sanitization issue");
        }

        let enhanced = self.enhancer.enhance(&prepared.sanitized.text).await?;

        info!(
            composed_length = prepared.composed.len(),
            enhanced_length = enhanced.len(),
            "Prompt enhanced"
        );

        Ok(PromptArtifacts {
            composed: prepared.composed,
            sanitized: prepared.sanitized.text,
            issues: prepared.sanitized.issues,
            enhanced,
        })
    }

    /// Session-gated entry point; expired contexts never reach the pipeline.
    pub async fn process_gated(
        &self,
        session: &SessionContext,
        request: &PromptRequest,
    ) -> Result<PromptArtifacts, PipelineError> {
        if !session.is_active() {
            return Err(PipelineError::SessionExpired(session.expires_at));
        }

        self.process(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Duration;
    use std::sync::Mutex;

    /// Records every prompt it receives and replies with a canned answer.
    struct StubEnhancer {
        seen: Mutex<Vec<String>>,
        reply: String,
    }

    impl StubEnhancer {
        fn replying(reply: &str) -> Self {
            Self {
                seen: Mutex::new(Vec::new()),
                reply: reply.to_string(),
            }
        }
    }

    #[async_trait]
    impl Enhance for StubEnhancer {
        async fn enhance(&self, prompt: &str) -> Result<String, EnhancerError> {
            self.seen.lock().unwrap().push(prompt.to_string());
            Ok(self.reply.clone())
        }
    }

    struct FailingEnhancer;

    #[async_trait]
    impl Enhance for FailingEnhancer {
        async fn enhance(&self, _prompt: &str) -> Result<String, EnhancerError> {
            Err(EnhancerError::Connection)
        }
    }

    fn request(goal: &str) -> PromptRequest {
        PromptRequest {
            goal: goal.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn process_returns_all_artifacts() {
        let pipeline = PromptPipeline::new(StubEnhancer::replying("Rewritten.")).unwrap();
        let artifacts = pipeline
            .process(&request("Summarize X"))
            .await
            .unwrap();

        assert_eq!(artifacts.composed, "**Goal:**\nSummarize X");
        assert_eq!(artifacts.sanitized, "**Goal:**\nSummarize X");
        assert!(artifacts.issues.is_empty());
        assert_eq!(artifacts.enhanced, "Rewritten.");
    }

    #[tokio::test]
    async fn enhancer_sees_the_sanitized_text_not_the_raw_one() {
        let pipeline =
            PromptPipeline::new(StubEnhancer::replying("ok")).unwrap();
        let artifacts = pipeline
            .process(&request("Mail a@b.com about it"))
            .await
            .unwrap();

        assert!(artifacts.issues.contains_key(&IssueCategory::PersonalData));
        let seen = pipeline.enhancer.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].contains("[personal data removed]"));
        assert!(!seen[0].contains("a@b.com"));
    }

    #[tokio::test]
    async fn empty_request_never_reaches_the_enhancer() {
        let pipeline = PromptPipeline::new(StubEnhancer::replying("ok")).unwrap();
        let result = pipeline.process(&PromptRequest::default()).await;

        assert!(matches!(result, Err(PipelineError::EmptyPrompt)));
        assert!(pipeline.enhancer.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn enhancement_failure_fails_the_request() {
        let pipeline = PromptPipeline::new(FailingEnhancer).unwrap();
        let result = pipeline.process(&request("Summarize X")).await;

        assert!(matches!(
            result,
            Err(PipelineError::Enhancement(EnhancerError::Connection))
        ));
    }

    #[tokio::test]
    async fn prepare_survives_enhancer_outage() {
        let pipeline = PromptPipeline::new(FailingEnhancer).unwrap();
        let prepared = pipeline.prepare(&request("Summarize X"));

        assert_eq!(prepared.composed, "**Goal:**\nSummarize X");
        assert_eq!(prepared.sanitized.text, "**Goal:**\nSummarize X");
    }

    #[tokio::test]
    async fn expired_session_is_refused_before_any_work() {
        let pipeline = PromptPipeline::new(StubEnhancer::replying("ok")).unwrap();
        let mut session = SessionContext::issue(Duration::minutes(30));
        session.expires_at = Utc::now() - Duration::seconds(1);

        let result = pipeline.process_gated(&session, &request("Summarize X")).await;

        assert!(matches!(result, Err(PipelineError::SessionExpired(_))));
        assert!(pipeline.enhancer.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn active_session_passes_through() {
        let pipeline = PromptPipeline::new(StubEnhancer::replying("ok")).unwrap();
        let session = SessionContext::issue(Duration::minutes(30));

        let artifacts = pipeline
            .process_gated(&session, &request("Summarize X"))
            .await
            .unwrap();
        assert_eq!(artifacts.enhanced, "ok");
    }
}
