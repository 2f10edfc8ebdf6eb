// src/course/briefing.rs — Briefing stage: audience and topic extraction

use std::sync::Arc;

use super::types::{Briefing, DocumentInput, RoleIndustry, TopicPair};
use crate::infra::errors::CourseForgeError;
use crate::provider::{ChatRequest, Message, ModelProvider, TokenUsage};
use crate::util::extract_json;

const ROLE_SYSTEM: &str = "You are an expert at analyzing professional documents.";
const PAIRS_SYSTEM: &str = "You are an expert at analyzing professional communication scenarios.";

/// Analyzes the document and produces the briefing that drives the rest of
/// the pipeline: who the audience is, and which speaking scenarios to turn
/// into courses.
pub struct BriefingStage {
    provider: Arc<dyn ModelProvider>,
    model: String,
}

impl BriefingStage {
    pub fn new(provider: Arc<dyn ModelProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    /// Run both extraction calls. Returns the briefing plus token usage.
    pub async fn extract(
        &self,
        doc: &DocumentInput,
    ) -> Result<(Briefing, TokenUsage), CourseForgeError> {
        let mut usage = TokenUsage::default();

        let role_industry = self.extract_role_industry(doc, &mut usage).await?;
        tracing::info!(
            role = %role_industry.role,
            industry = %role_industry.industry,
            "briefing: audience extracted",
        );

        let topic_pairs = self
            .extract_topic_pairs(doc, &role_industry, &mut usage)
            .await?;
        tracing::info!(topics = topic_pairs.len(), "briefing: topics extracted");

        Ok((
            Briefing {
                role_industry,
                topic_pairs,
            },
            usage,
        ))
    }

    async fn extract_role_industry(
        &self,
        doc: &DocumentInput,
        usage: &mut TokenUsage,
    ) -> Result<RoleIndustry, CourseForgeError> {
        let prompt = format!(
            "Analyze this introduction and extract the professional role and \
             industry it is intended for.\n\nIntroduction:\n{}\n\n\
             Respond with JSON only:\n\
             {{\"role\": \"the job role/profession\", \"industry\": \"the industry or sector\"}}",
            doc.introduction,
        );

        let response = self
            .provider
            .chat(ChatRequest {
                model: self.model.clone(),
                messages: vec![Message::user(prompt)],
                max_tokens: Some(1024),
                temperature: Some(0.3),
                system: Some(ROLE_SYSTEM.into()),
            })
            .await?;
        usage.add(&response.usage);

        parse_payload(&response.content, "role/industry")
    }

    async fn extract_topic_pairs(
        &self,
        doc: &DocumentInput,
        audience: &RoleIndustry,
        usage: &mut TokenUsage,
    ) -> Result<Vec<TopicPair>, CourseForgeError> {
        let prompt = format!(
            "Analyze this content and identify all distinct topic-description \
             pairs. Each topic should be a specific speaking scenario or \
             situation that a {} in {} would encounter.\n\nContent:\n{}\n\n\
             These should be practical, real-world speaking scenarios. \
             Respond with a JSON array only:\n\
             [{{\"topic\": \"...\", \"description\": \"...\"}}]",
            audience.role, audience.industry, doc.main_content,
        );

        let response = self
            .provider
            .chat(ChatRequest {
                model: self.model.clone(),
                messages: vec![Message::user(prompt)],
                max_tokens: Some(4096),
                temperature: Some(0.3),
                system: Some(PAIRS_SYSTEM.into()),
            })
            .await?;
        usage.add(&response.usage);

        let pairs: Vec<TopicPair> = parse_payload(&response.content, "topic pairs")?;
        if pairs.is_empty() {
            return Err(CourseForgeError::MalformedResponse {
                expected: "topic pairs",
                message: "model returned an empty topic list".into(),
            });
        }
        Ok(pairs)
    }
}

/// Extract and deserialize a JSON payload from model text.
pub(crate) fn parse_payload<T: serde::de::DeserializeOwned>(
    response: &str,
    expected: &'static str,
) -> Result<T, CourseForgeError> {
    let payload = extract_json(response).ok_or_else(|| CourseForgeError::MalformedResponse {
        expected,
        message: "no JSON found in model response".into(),
    })?;
    serde_json::from_str(payload).map_err(|e| CourseForgeError::MalformedResponse {
        expected,
        message: e.to_string(),
    })
}
