// src/course/types.rs — Course domain types

use serde::{Deserialize, Serialize};

use crate::provider::TokenUsage;

/// Structured document fed into the pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentInput {
    #[serde(default)]
    pub introduction: String,
    #[serde(default)]
    pub main_content: String,
    #[serde(default)]
    pub conclusion: String,
}

impl DocumentInput {
    /// Parse a JSON document, or fall back to a paragraph-split of plain text:
    /// first paragraph becomes the introduction, last the conclusion,
    /// everything between the main content.
    pub fn parse(raw: &str) -> Self {
        if let Ok(doc) = serde_json::from_str::<DocumentInput>(raw) {
            return doc;
        }
        Self::from_text(raw)
    }

    pub fn from_text(text: &str) -> Self {
        let paragraphs: Vec<&str> = text
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();

        match paragraphs.len() {
            0 => Self::default(),
            1 => Self {
                main_content: paragraphs[0].to_string(),
                ..Default::default()
            },
            2 => Self {
                introduction: paragraphs[0].to_string(),
                main_content: paragraphs[1].to_string(),
                ..Default::default()
            },
            n => Self {
                introduction: paragraphs[0].to_string(),
                main_content: paragraphs[1..n - 1].join("\n\n"),
                conclusion: paragraphs[n - 1].to_string(),
            },
        }
    }
}

/// The professional audience extracted from the document introduction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleIndustry {
    pub role: String,
    pub industry: String,
}

/// A speaking scenario with its description, extracted from the main content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicPair {
    pub topic: String,
    pub description: String,
}

/// Output of the briefing stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Briefing {
    pub role_industry: RoleIndustry,
    pub topic_pairs: Vec<TopicPair>,
}

/// A lesson as sketched by the outline stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonIntro {
    pub lesson_number: u32,
    pub lesson_title: String,
    pub lesson_introduction: String,
    #[serde(default)]
    pub is_bonus: bool,
}

/// A course outline: name plus sequential lesson intros.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseOutline {
    pub course_name: String,
    pub lessons: Vec<LessonIntro>,
}

/// A category of phrases to learn, with examples.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageAim {
    pub aim_category: String,
    pub examples: Vec<String>,
}

/// A fully enriched lesson.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullLesson {
    pub lesson_number: u32,
    pub lesson_title: String,
    pub lesson_introduction: String,
    #[serde(default)]
    pub skill_aims: Vec<String>,
    #[serde(default)]
    pub language_learning_aims: Vec<LanguageAim>,
    #[serde(default)]
    pub lesson_summary: Vec<String>,
    #[serde(default)]
    pub is_bonus: bool,
}

impl FullLesson {
    /// Fallback when an enrichment call fails: keep the intro, leave the
    /// detail fields empty.
    pub fn from_intro(intro: &LessonIntro) -> Self {
        Self {
            lesson_number: intro.lesson_number,
            lesson_title: intro.lesson_title.clone(),
            lesson_introduction: intro.lesson_introduction.clone(),
            skill_aims: Vec::new(),
            language_learning_aims: Vec::new(),
            lesson_summary: Vec::new(),
            is_bonus: intro.is_bonus,
        }
    }
}

/// One finished course for one topic pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub course_name: String,
    pub topic_pair: TopicPair,
    pub lessons: Vec<FullLesson>,
}

/// A topic that was dropped from the plan, and why.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedTopic {
    pub topic_pair: TopicPair,
    pub reason: String,
}

/// Final pipeline output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoursePlan {
    pub role: String,
    pub industry: String,
    pub courses: Vec<Course>,
    #[serde(default)]
    pub skipped: Vec<SkippedTopic>,
    #[serde(default)]
    pub usage: TokenUsage,
}
