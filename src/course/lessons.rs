// src/course/lessons.rs — Enrichment stage: full lesson content

use std::sync::Arc;

use super::briefing::parse_payload;
use super::types::{FullLesson, LessonIntro, RoleIndustry};
use crate::infra::errors::CourseForgeError;
use crate::provider::{ChatRequest, Message, ModelProvider, TokenUsage};

/// Expands lesson intros into complete lessons with skill aims, language
/// learning aims, and summaries.
pub struct LessonEnricher {
    provider: Arc<dyn ModelProvider>,
    model: String,
    max_tokens: u32,
}

impl LessonEnricher {
    pub fn new(provider: Arc<dyn ModelProvider>, model: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            provider,
            model: model.into(),
            max_tokens,
        }
    }

    /// Enrich every lesson of a course, sequentially.
    ///
    /// A failed enrichment call degrades to the bare intro rather than
    /// failing the course.
    pub async fn enrich(
        &self,
        course_name: &str,
        audience: &RoleIndustry,
        intros: &[LessonIntro],
    ) -> Result<(Vec<FullLesson>, TokenUsage), CourseForgeError> {
        let mut lessons = Vec::with_capacity(intros.len());
        let mut usage = TokenUsage::default();

        for intro in intros {
            match self.enrich_one(course_name, audience, intro).await {
                Ok((full, call_usage)) => {
                    usage.add(&call_usage);
                    lessons.push(full);
                }
                Err(e) => {
                    tracing::warn!(
                        course = course_name,
                        lesson = intro.lesson_number,
                        error = %e,
                        "lesson enrichment failed, keeping bare intro",
                    );
                    lessons.push(FullLesson::from_intro(intro));
                }
            }
        }

        Ok((lessons, usage))
    }

    async fn enrich_one(
        &self,
        course_name: &str,
        audience: &RoleIndustry,
        intro: &LessonIntro,
    ) -> Result<(FullLesson, TokenUsage), CourseForgeError> {
        let prompt = format!(
            "You are creating a complete lesson for {role} professionals in {industry}.\n\n\
             Course: {course}\n\
             Lesson {number}: {title}\n\
             Introduction: {introduction}\n\n\
             Generate the complete lesson content including:\n\
             1. Skill Aims (4-5 specific communication skills)\n\
             2. Language Learning Aims (3-4 categories with 3 example phrases each)\n\
             3. Lesson Summary (4 key takeaways)\n\n\
             Focus on practical verbal communication skills and real phrases \
             professionals would use. Respond with JSON only:\n\
             {{\"lesson_number\": {number}, \"lesson_title\": \"...\", \
             \"lesson_introduction\": \"...\", \"skill_aims\": [\"...\"], \
             \"language_learning_aims\": [{{\"aim_category\": \"...\", \
             \"examples\": [\"...\"]}}], \"lesson_summary\": [\"...\"], \
             \"is_bonus\": {is_bonus}}}",
            role = audience.role,
            industry = audience.industry,
            course = course_name,
            number = intro.lesson_number,
            title = intro.lesson_title,
            introduction = intro.lesson_introduction,
            is_bonus = intro.is_bonus,
        );

        let response = self
            .provider
            .chat(ChatRequest {
                model: self.model.clone(),
                messages: vec![Message::user(prompt)],
                max_tokens: Some(self.max_tokens),
                temperature: Some(0.7),
                system: Some(format!(
                    "You are an expert communication trainer for {} professionals.",
                    audience.industry,
                )),
            })
            .await?;

        let full: FullLesson = parse_payload(&response.content, "full lesson")?;
        Ok((full, response.usage))
    }
}
