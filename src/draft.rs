// src/draft.rs — Single-topic prose drafting via the refine loop

use std::sync::Arc;

use async_trait::async_trait;

use crate::core::refine::{Evaluator, Generator};
use crate::core::types::{Candidate, Feedback, Topic};
use crate::infra::errors::CourseForgeError;
use crate::provider::{ChatRequest, Message, ModelProvider};

const GENERATOR_SYSTEM: &str =
    "You are an expert writer of short professional course drafts. \
     Write clear, practical prose aimed at workplace communication.";

const EVALUATOR_SYSTEM: &str =
    "You are a quality assurance reviewer for educational content. \
     Judge drafts strictly but fairly.";

/// Guidance substituted when a model rejects without saying why.
const DEFAULT_GUIDANCE: &str =
    "The draft was rejected without specific guidance. Improve clarity and practical focus.";

/// LLM-backed generator producing a plain-text course draft.
pub struct ProseGenerator {
    provider: Arc<dyn ModelProvider>,
    model: String,
    max_tokens: u32,
}

impl ProseGenerator {
    pub fn new(provider: Arc<dyn ModelProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            max_tokens: 2048,
        }
    }

    fn build_prompt(topic: &Topic, feedback: Option<&Feedback>) -> String {
        let mut prompt = format!(
            "Write a short course draft on the following topic.\n\nTopic: {}\n\n\
             The draft should introduce the topic, list 3-5 learning points, \
             and close with a practical takeaway.",
            topic,
        );
        if let Some(guidance) = feedback.and_then(|f| f.guidance()) {
            prompt.push_str(&format!(
                "\n\nA previous draft was rejected with this feedback. \
                 Address it in the new draft:\n{}",
                guidance,
            ));
        }
        prompt
    }
}

#[async_trait]
impl Generator for ProseGenerator {
    async fn generate(
        &self,
        topic: &Topic,
        feedback: Option<&Feedback>,
    ) -> Result<Candidate, CourseForgeError> {
        let response = self
            .provider
            .chat(ChatRequest {
                model: self.model.clone(),
                messages: vec![Message::user(Self::build_prompt(topic, feedback))],
                max_tokens: Some(self.max_tokens),
                temperature: Some(0.5),
                system: Some(GENERATOR_SYSTEM.into()),
            })
            .await?;

        Ok(Candidate::new(topic.clone(), response.content).with_usage(response.usage))
    }
}

/// LLM-backed evaluator emitting a plain-text VERDICT/GUIDANCE judgment.
pub struct ProseEvaluator {
    provider: Arc<dyn ModelProvider>,
    model: String,
}

impl ProseEvaluator {
    pub fn new(provider: Arc<dyn ModelProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    fn build_prompt(candidate: &Candidate) -> String {
        format!(
            "Evaluate this course draft.\n\nTopic: {}\n\nDraft:\n{}\n\n\
             Check that it stays on topic, has concrete learning points, and \
             ends with a practical takeaway.\n\
             Respond in exactly this format:\n\
             VERDICT: accepted or rejected\n\
             GUIDANCE: when rejected, concrete instructions for improving the draft",
            candidate.topic, candidate.content,
        )
    }
}

#[async_trait]
impl Evaluator for ProseEvaluator {
    async fn evaluate(&self, candidate: &Candidate) -> Result<Feedback, CourseForgeError> {
        let response = self
            .provider
            .chat(ChatRequest {
                model: self.model.clone(),
                messages: vec![Message::user(Self::build_prompt(candidate))],
                max_tokens: Some(1024),
                temperature: Some(0.0),
                system: Some(EVALUATOR_SYSTEM.into()),
            })
            .await?;

        tracing::debug!(tokens = response.usage.total(), "draft evaluation call");
        Ok(parse_verdict(&response.content))
    }
}

/// Parse a VERDICT/GUIDANCE response into Feedback.
///
/// Lenient about casing and markdown decoration. A rejection with no usable
/// guidance gets a substituted default so the rejected-guidance invariant
/// holds; an unparsable response is treated as a rejection for the same
/// reason.
pub fn parse_verdict(response: &str) -> Feedback {
    let mut verdict: Option<bool> = None;
    let mut guidance_lines: Vec<&str> = Vec::new();
    let mut in_guidance = false;

    for line in response.lines() {
        let trimmed = line.trim().trim_start_matches(['*', '#', '-']).trim();
        let lower = trimmed.to_ascii_lowercase();

        if let Some(rest) = lower.strip_prefix("verdict:") {
            in_guidance = false;
            let rest = rest.trim().trim_start_matches('*').trim();
            if rest.starts_with("accept") {
                verdict = Some(true);
            } else if rest.starts_with("reject") {
                verdict = Some(false);
            }
            continue;
        }

        if lower.starts_with("guidance:") {
            in_guidance = true;
            let rest = trimmed[trimmed
                .to_ascii_lowercase()
                .find("guidance:")
                .map(|i| i + "guidance:".len())
                .unwrap_or(0)..]
                .trim()
                .trim_start_matches('*')
                .trim();
            if !rest.is_empty() {
                guidance_lines.push(rest);
            }
            continue;
        }

        if in_guidance && !trimmed.is_empty() {
            guidance_lines.push(trimmed);
        }
    }

    match verdict {
        Some(true) => Feedback::Accepted,
        _ => {
            let guidance = guidance_lines.join(" ");
            if guidance.is_empty() {
                Feedback::rejected(DEFAULT_GUIDANCE)
            } else {
                Feedback::rejected(guidance)
            }
        }
    }
}
