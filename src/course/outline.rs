// src/course/outline.rs — Outline stage: per-topic generator and evaluator

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use super::briefing::parse_payload;
use super::types::{CourseOutline, RoleIndustry, TopicPair};
use crate::core::refine::{Evaluator, Generator};
use crate::core::types::{Candidate, Feedback, Topic};
use crate::infra::errors::CourseForgeError;
use crate::provider::{ChatRequest, Message, ModelProvider};

/// Guidance substituted when the evaluator rejects without explaining itself.
const DEFAULT_GUIDANCE: &str =
    "The outline was rejected without specific feedback. Re-check lesson ordering, \
     topical relevance, and the speaking focus of every lesson.";

/// Generates a course outline for one topic pair.
///
/// The candidate content is the outline re-serialized as canonical JSON, so
/// downstream consumers can parse it without worrying about fences or prose.
pub struct OutlineGenerator {
    provider: Arc<dyn ModelProvider>,
    model: String,
    audience: RoleIndustry,
    pair: TopicPair,
    max_tokens: u32,
}

impl OutlineGenerator {
    pub fn new(
        provider: Arc<dyn ModelProvider>,
        model: impl Into<String>,
        audience: RoleIndustry,
        pair: TopicPair,
        max_tokens: u32,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            audience,
            pair,
            max_tokens,
        }
    }

    fn build_prompt(&self, feedback: Option<&Feedback>) -> String {
        let mut prompt = format!(
            "You are a subject matter expert for {role} professionals in the \
             {industry} industry.\n\n\
             Topic: {topic}\nDescription: {description}\n\n\
             Your task is to create a course that breaks down this speaking \
             scenario into sequential lessons. Each lesson should represent a \
             different part of the conversation, starting from the beginning \
             and progressing to the end.\n\n\
             Requirements:\n\
             1. Create lessons that follow the natural flow of the conversation\n\
             2. Each lesson should focus on a specific part of the speaking interaction\n\
             3. Add 1-2 bonus lessons for important skills that don't fit the sequential flow\n\
             4. All lessons must be speaking/verbal communication focused\n\
             5. Generate an appropriate course name\n\n\
             Respond with JSON only:\n\
             {{\"course_name\": \"...\", \"lessons\": [{{\"lesson_number\": 1, \
             \"lesson_title\": \"...\", \"lesson_introduction\": \"...\", \
             \"is_bonus\": false}}]}}",
            role = self.audience.role,
            industry = self.audience.industry,
            topic = self.pair.topic,
            description = self.pair.description,
        );
        if let Some(guidance) = feedback.and_then(|f| f.guidance()) {
            prompt.push_str(&format!(
                "\n\nA previous outline was rejected by review with this \
                 feedback. Address it:\n{}",
                guidance,
            ));
        }
        prompt
    }
}

#[async_trait]
impl Generator for OutlineGenerator {
    async fn generate(
        &self,
        topic: &Topic,
        feedback: Option<&Feedback>,
    ) -> Result<Candidate, CourseForgeError> {
        let response = self
            .provider
            .chat(ChatRequest {
                model: self.model.clone(),
                messages: vec![Message::user(self.build_prompt(feedback))],
                max_tokens: Some(self.max_tokens),
                temperature: Some(0.5),
                system: Some(format!(
                    "You are an expert in professional communication training for {}.",
                    self.audience.industry,
                )),
            })
            .await?;

        // Validate and canonicalize before handing the candidate on
        let outline: CourseOutline = parse_payload(&response.content, "course outline")?;
        let canonical = serde_json::to_string(&outline)
            .map_err(|e| anyhow::anyhow!("re-serializing outline: {e}"))?;

        Ok(Candidate::new(topic.clone(), canonical).with_usage(response.usage))
    }
}

/// The shape the evaluator model is asked to answer with.
#[derive(Debug, Deserialize)]
struct EvalResult {
    passed: bool,
    #[serde(default)]
    feedback: Option<String>,
}

/// Judges an outline candidate against the course quality criteria.
pub struct OutlineEvaluator {
    provider: Arc<dyn ModelProvider>,
    model: String,
    pair: TopicPair,
}

impl OutlineEvaluator {
    pub fn new(
        provider: Arc<dyn ModelProvider>,
        model: impl Into<String>,
        pair: TopicPair,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            pair,
        }
    }

    fn build_prompt(&self, candidate: &Candidate) -> String {
        format!(
            "Evaluate this course structure:\n\n{}\n\n\
             Check if:\n\
             1. Lessons are in sequential order (except bonus lessons)\n\
             2. All lessons are relevant to the topic: {}\n\
             3. All lessons are speaking/verbal communication related\n\
             4. Output is properly structured\n\n\
             Provide feedback if any criteria are not met. Respond with JSON only:\n\
             {{\"passed\": true|false, \"feedback\": \"concrete improvement guidance when failed\"}}",
            candidate.content, self.pair.topic,
        )
    }
}

#[async_trait]
impl Evaluator for OutlineEvaluator {
    async fn evaluate(&self, candidate: &Candidate) -> Result<Feedback, CourseForgeError> {
        let response = self
            .provider
            .chat(ChatRequest {
                model: self.model.clone(),
                messages: vec![Message::user(self.build_prompt(candidate))],
                max_tokens: Some(2048),
                temperature: Some(0.0),
                system: Some(
                    "You are a quality assurance expert for educational content.".into(),
                ),
            })
            .await?;
        tracing::debug!(
            topic = %candidate.topic,
            tokens = response.usage.total(),
            "outline evaluation call",
        );

        let result: EvalResult = parse_payload(&response.content, "evaluation result")?;
        if result.passed {
            Ok(Feedback::Accepted)
        } else {
            let guidance = result
                .feedback
                .filter(|f| !f.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_GUIDANCE.to_string());
            Ok(Feedback::rejected(guidance))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_pair() -> TopicPair {
        TopicPair {
            topic: "Handling a delayed flight announcement".into(),
            description: "Explaining delays to passengers calmly.".into(),
        }
    }

    fn sample_audience() -> RoleIndustry {
        RoleIndustry {
            role: "Flight Attendant".into(),
            industry: "Aviation".into(),
        }
    }

    #[test]
    fn test_outline_prompt_mentions_topic_and_audience() {
        let generator = OutlineGenerator::new(
            crate::course::test_support::null_provider(),
            "m",
            sample_audience(),
            sample_pair(),
            4096,
        );
        let prompt = generator.build_prompt(None);
        assert!(prompt.contains("Flight Attendant"));
        assert!(prompt.contains("Aviation"));
        assert!(prompt.contains("Handling a delayed flight announcement"));
        assert!(!prompt.contains("previous outline"));
    }

    #[test]
    fn test_outline_prompt_folds_in_guidance() {
        let generator = OutlineGenerator::new(
            crate::course::test_support::null_provider(),
            "m",
            sample_audience(),
            sample_pair(),
            4096,
        );
        let prompt = generator.build_prompt(Some(&Feedback::rejected("lesson 3 is off-topic")));
        assert!(prompt.contains("lesson 3 is off-topic"));
    }

    #[test]
    fn test_eval_result_parses_without_feedback_field() {
        let r: EvalResult = serde_json::from_str(r#"{"passed": true}"#).unwrap();
        assert!(r.passed);
        assert!(r.feedback.is_none());
    }

    #[test]
    fn test_eval_result_parses_null_feedback() {
        let r: EvalResult =
            serde_json::from_str(r#"{"passed": false, "feedback": null}"#).unwrap();
        assert!(!r.passed);
        assert!(r.feedback.is_none());
    }
}
