// src/course/mod.rs — Course generation pipeline

pub mod briefing;
pub mod lessons;
pub mod outline;
pub mod types;

use std::sync::Arc;

use futures::stream::{self, StreamExt};

use crate::core::refine::RefineLoop;
use crate::core::types::{ProgressEvent, RefineConfig, Topic};
use crate::infra::config::Config;
use crate::infra::errors::CourseForgeError;
use crate::provider::roles::PipelineRoles;
use crate::provider::{resolver, ModelProvider, TokenUsage};
use briefing::BriefingStage;
use lessons::LessonEnricher;
use outline::{OutlineEvaluator, OutlineGenerator};
use types::{Course, CourseOutline, CoursePlan, DocumentInput, SkippedTopic, TopicPair};

/// Drives a document through briefing, parallel outline refinement,
/// enrichment, and aggregation.
pub struct CoursePipeline {
    briefing: BriefingStage,
    outliner: Arc<dyn ModelProvider>,
    outliner_model: String,
    evaluator: Arc<dyn ModelProvider>,
    evaluator_model: String,
    enricher: LessonEnricher,
    refine: RefineConfig,
    max_parallel: usize,
    max_output_tokens: u32,
    on_progress: Option<Arc<dyn Fn(ProgressEvent) + Send + Sync>>,
}

impl CoursePipeline {
    pub fn new(
        providers: &[Arc<dyn ModelProvider>],
        roles: &PipelineRoles,
        config: &Config,
    ) -> Result<Self, CourseForgeError> {
        let planner = resolver::provider_for(providers, &roles.planner)?;
        let outliner = resolver::provider_for(providers, &roles.outliner)?;
        let enricher = resolver::provider_for(providers, &roles.enricher)?;
        let evaluator = resolver::provider_for(providers, &roles.evaluator)?;

        Ok(Self {
            briefing: BriefingStage::new(planner, roles.planner.model.clone()),
            outliner,
            outliner_model: roles.outliner.model.clone(),
            evaluator,
            evaluator_model: roles.evaluator.model.clone(),
            enricher: LessonEnricher::new(
                enricher,
                roles.enricher.model.clone(),
                config.pipeline.max_output_tokens,
            ),
            refine: RefineConfig::from(&config.refine),
            max_parallel: config.pipeline.max_parallel_topics.max(1),
            max_output_tokens: config.pipeline.max_output_tokens,
            on_progress: None,
        })
    }

    /// Set a callback for stage-transition events across the whole run.
    pub fn with_progress(mut self, cb: impl Fn(ProgressEvent) + Send + Sync + 'static) -> Self {
        self.on_progress = Some(Arc::new(cb));
        self
    }

    fn emit(&self, event: ProgressEvent) {
        if let Some(ref cb) = self.on_progress {
            cb(event);
        }
    }

    fn emit_stage(&self, stage: &str) {
        self.emit(ProgressEvent::StageChanged {
            stage: stage.to_string(),
        });
    }

    /// Run the full pipeline for one document.
    pub async fn run(&self, doc: &DocumentInput) -> Result<CoursePlan, CourseForgeError> {
        let mut usage = TokenUsage::default();

        self.emit_stage("briefing");
        let (briefing, briefing_usage) = self.briefing.extract(doc).await?;
        usage.add(&briefing_usage);

        self.emit_stage("outlining");
        let outlines = self.outline_topics(&briefing).await;

        self.emit_stage("enriching");
        let mut courses = Vec::new();
        let mut skipped = Vec::new();
        for (pair, result) in outlines {
            match result {
                Ok((outline, outline_usage)) => {
                    usage.add(&outline_usage);
                    let (full_lessons, enrich_usage) = self
                        .enricher
                        .enrich(&outline.course_name, &briefing.role_industry, &outline.lessons)
                        .await?;
                    usage.add(&enrich_usage);
                    courses.push(Course {
                        course_name: outline.course_name,
                        topic_pair: pair,
                        lessons: full_lessons,
                    });
                }
                Err(e) => {
                    tracing::warn!(topic = %pair.topic, error = %e, "topic skipped");
                    self.emit(ProgressEvent::TopicSkipped {
                        topic: pair.topic.clone(),
                        reason: e.to_string(),
                    });
                    skipped.push(SkippedTopic {
                        topic_pair: pair,
                        reason: e.to_string(),
                    });
                }
            }
        }

        self.emit_stage("aggregating");
        Ok(CoursePlan {
            role: briefing.role_industry.role.clone(),
            industry: briefing.role_industry.industry.clone(),
            courses,
            skipped,
            usage,
        })
    }

    /// Run one refine loop per topic pair, bounded to `max_parallel` at a
    /// time. Results come back in document order; a failed topic carries its
    /// error instead of aborting the others.
    async fn outline_topics(
        &self,
        briefing: &types::Briefing,
    ) -> Vec<(
        TopicPair,
        Result<(CourseOutline, TokenUsage), CourseForgeError>,
    )> {
        let mut results: Vec<_> = stream::iter(briefing.topic_pairs.iter().cloned().enumerate())
            .map(|(idx, pair)| {
                let generator = OutlineGenerator::new(
                    self.outliner.clone(),
                    self.outliner_model.clone(),
                    briefing.role_industry.clone(),
                    pair.clone(),
                    self.max_output_tokens,
                );
                let evaluator = OutlineEvaluator::new(
                    self.evaluator.clone(),
                    self.evaluator_model.clone(),
                    pair.clone(),
                );
                let mut refine = RefineLoop::new(
                    Arc::new(generator),
                    Arc::new(evaluator),
                    self.refine.clone(),
                );
                if let Some(ref cb) = self.on_progress {
                    refine = refine.with_shared_progress(cb.clone());
                }

                async move {
                    let result = refine.run(Topic::new(&pair.topic)).await.and_then(|outcome| {
                        let outline: CourseOutline =
                            serde_json::from_str(&outcome.candidate.content).map_err(|e| {
                                CourseForgeError::MalformedResponse {
                                    expected: "course outline",
                                    message: e.to_string(),
                                }
                            })?;
                        Ok((outline, outcome.usage))
                    });
                    (idx, pair, result)
                }
            })
            .buffer_unordered(self.max_parallel)
            .collect()
            .await;

        results.sort_by_key(|(idx, _, _)| *idx);
        results
            .into_iter()
            .map(|(_, pair, result)| (pair, result))
            .collect()
    }
}
