// src/core/refine.rs — Generate-evaluate-refine loop controller

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use super::types::{Candidate, Feedback, ProgressEvent, RefineConfig, RefineOutcome, Topic};
use crate::infra::errors::CourseForgeError;
use crate::provider::TokenUsage;

/// Produces a candidate artifact for a topic, folding in the evaluator's
/// guidance from the previous round when present.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(
        &self,
        topic: &Topic,
        feedback: Option<&Feedback>,
    ) -> Result<Candidate, CourseForgeError>;
}

/// Judges a candidate: accept it, or reject it with concrete guidance.
#[async_trait]
pub trait Evaluator: Send + Sync {
    async fn evaluate(&self, candidate: &Candidate) -> Result<Feedback, CourseForgeError>;
}

/// The loop controller alternating Generator and Evaluator until acceptance.
///
/// Strictly sequential within one run: each generation completes before its
/// evaluation, and each evaluation before the continue/stop decision.
/// Feedback is recomputed fresh every iteration; only a rejection is carried
/// into the next generation call. The run ends with the accepted candidate,
/// an `IterationLimitExceeded` once the configured bound is spent, or the
/// first generation/evaluation failure.
pub struct RefineLoop {
    generator: Arc<dyn Generator>,
    evaluator: Arc<dyn Evaluator>,
    config: RefineConfig,
    on_progress: Option<Arc<dyn Fn(ProgressEvent) + Send + Sync>>,
}

impl RefineLoop {
    pub fn new(
        generator: Arc<dyn Generator>,
        evaluator: Arc<dyn Evaluator>,
        config: RefineConfig,
    ) -> Self {
        Self {
            generator,
            evaluator,
            config,
            on_progress: None,
        }
    }

    /// Set a callback for stage-transition events.
    pub fn with_progress(mut self, cb: impl Fn(ProgressEvent) + Send + Sync + 'static) -> Self {
        self.on_progress = Some(Arc::new(cb));
        self
    }

    /// Share an existing progress callback, e.g. across parallel loop instances.
    pub fn with_shared_progress(
        mut self,
        cb: Arc<dyn Fn(ProgressEvent) + Send + Sync>,
    ) -> Self {
        self.on_progress = Some(cb);
        self
    }

    fn emit(&self, event: ProgressEvent) {
        if let Some(ref cb) = self.on_progress {
            cb(event);
        }
    }

    /// Await a capability call under the configured per-call timeout.
    async fn timed<T>(
        &self,
        phase: &'static str,
        fut: impl Future<Output = Result<T, CourseForgeError>>,
    ) -> Result<T, CourseForgeError> {
        match tokio::time::timeout(self.config.call_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(CourseForgeError::CallTimeout {
                phase,
                timeout_ms: self.config.call_timeout.as_millis() as u64,
            }),
        }
    }

    /// Run the loop for a topic until acceptance or a terminal failure.
    pub async fn run(&self, topic: Topic) -> Result<RefineOutcome, CourseForgeError> {
        let max = self.config.max_iterations;
        let mut feedback: Option<Feedback> = None;
        let mut usage = TokenUsage::default();

        for i in 1..=max {
            self.emit(ProgressEvent::GenerationStart {
                topic: topic.to_string(),
                iteration: i,
                max_iterations: max,
            });

            let candidate = self
                .timed("generation", self.generator.generate(&topic, feedback.as_ref()))
                .await
                .map_err(|e| match e {
                    timeout @ CourseForgeError::CallTimeout { .. } => timeout,
                    other => CourseForgeError::generation(other),
                })?;
            usage.add(&candidate.usage);

            self.emit(ProgressEvent::CandidateReady {
                topic: topic.to_string(),
                iteration: i,
                chars: candidate.content.len(),
            });

            let verdict = self
                .timed("evaluation", self.evaluator.evaluate(&candidate))
                .await
                .map_err(|e| match e {
                    timeout @ CourseForgeError::CallTimeout { .. } => timeout,
                    other => CourseForgeError::evaluation(other),
                })?;

            match verdict {
                Feedback::Accepted => {
                    self.emit(ProgressEvent::Accepted {
                        topic: topic.to_string(),
                        iterations: i,
                        total_tokens: usage.total(),
                    });
                    return Ok(RefineOutcome {
                        candidate,
                        iterations: i,
                        usage,
                    });
                }
                rejected @ Feedback::Rejected { .. } => {
                    tracing::debug!(
                        topic = %topic,
                        iteration = i,
                        guidance = rejected.guidance().unwrap_or_default(),
                        "candidate rejected",
                    );
                    self.emit(ProgressEvent::Rejected {
                        topic: topic.to_string(),
                        iteration: i,
                        guidance: rejected.guidance().unwrap_or_default().to_string(),
                    });
                    feedback = Some(rejected);
                }
            }
        }

        Err(CourseForgeError::IterationLimitExceeded { iterations: max })
    }
}
