// src/core/types.rs — Core domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::infra::config::RefineSection;
use crate::provider::TokenUsage;

/// The immutable subject string driving a refinement run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Topic(String);

impl Topic {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A draft artifact produced by a generator for a topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub topic: Topic,
    pub content: String,
    pub usage: TokenUsage,
    pub created_at: DateTime<Utc>,
}

impl Candidate {
    pub fn new(topic: Topic, content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            topic,
            content: content.into(),
            usage: TokenUsage::default(),
            created_at: Utc::now(),
        }
    }

    pub fn with_usage(mut self, usage: TokenUsage) -> Self {
        self.usage = usage;
        self
    }
}

/// An evaluator's judgment of a candidate.
///
/// Guidance accompanies every rejection and is carried into the next
/// generation call; an acceptance carries nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Feedback {
    Accepted,
    Rejected { guidance: String },
}

impl Feedback {
    pub fn rejected(guidance: impl Into<String>) -> Self {
        Self::Rejected {
            guidance: guidance.into(),
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Feedback::Accepted)
    }

    pub fn guidance(&self) -> Option<&str> {
        match self {
            Feedback::Accepted => None,
            Feedback::Rejected { guidance } => Some(guidance),
        }
    }
}

/// Configuration for the refine loop.
#[derive(Debug, Clone)]
pub struct RefineConfig {
    /// Hard bound on generate/evaluate rounds per run.
    pub max_iterations: u32,
    /// Applied separately to each generator and evaluator call.
    pub call_timeout: Duration,
}

impl Default for RefineConfig {
    fn default() -> Self {
        Self {
            max_iterations: 3,
            call_timeout: Duration::from_secs(120),
        }
    }
}

impl From<&RefineSection> for RefineConfig {
    fn from(cfg: &RefineSection) -> Self {
        Self {
            max_iterations: cfg.max_iterations,
            call_timeout: Duration::from_secs(cfg.call_timeout_seconds),
        }
    }
}

/// Result of a refinement run that reached acceptance.
#[derive(Debug, Clone)]
pub struct RefineOutcome {
    /// The candidate that earned the accepting verdict.
    pub candidate: Candidate,
    /// Generate/evaluate rounds performed, including the accepting one.
    pub iterations: u32,
    /// Accumulated generator token usage across all iterations.
    pub usage: TokenUsage,
}

/// Stage-transition events published by the loop and pipeline to any
/// interested observer.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    StageChanged {
        stage: String,
    },
    GenerationStart {
        topic: String,
        iteration: u32,
        max_iterations: u32,
    },
    CandidateReady {
        topic: String,
        iteration: u32,
        chars: usize,
    },
    Rejected {
        topic: String,
        iteration: u32,
        guidance: String,
    },
    Accepted {
        topic: String,
        iterations: u32,
        total_tokens: u32,
    },
    TopicSkipped {
        topic: String,
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    // ─── Topic ──────────────────────────────────────────────────

    #[test]
    fn test_topic_display() {
        let t = Topic::new("Handling patient complaints");
        assert_eq!(t.as_str(), "Handling patient complaints");
        assert_eq!(format!("{}", t), "Handling patient complaints");
    }

    // ─── Candidate ──────────────────────────────────────────────

    #[test]
    fn test_candidate_new() {
        let c = Candidate::new(Topic::new("Cats"), "a text about cats");
        assert_eq!(c.topic.as_str(), "Cats");
        assert_eq!(c.content, "a text about cats");
        assert!(!c.id.is_empty());
        assert_eq!(c.usage.total(), 0);
    }

    #[test]
    fn test_candidate_unique_ids() {
        let a = Candidate::new(Topic::new("A"), "x");
        let b = Candidate::new(Topic::new("A"), "x");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_candidate_with_usage() {
        let c = Candidate::new(Topic::new("A"), "x").with_usage(TokenUsage {
            input_tokens: 10,
            output_tokens: 20,
        });
        assert_eq!(c.usage.total(), 30);
    }

    // ─── Feedback ───────────────────────────────────────────────

    #[test]
    fn test_feedback_accepted() {
        let f = Feedback::Accepted;
        assert!(f.is_accepted());
        assert!(f.guidance().is_none());
    }

    #[test]
    fn test_feedback_rejected_guidance() {
        let f = Feedback::rejected("add a pun");
        assert!(!f.is_accepted());
        assert_eq!(f.guidance(), Some("add a pun"));
    }

    #[test]
    fn test_feedback_serde_tagged() {
        let accepted = serde_json::to_string(&Feedback::Accepted).unwrap();
        assert_eq!(accepted, r#"{"verdict":"accepted"}"#);

        let rejected: Feedback =
            serde_json::from_str(r#"{"verdict":"rejected","guidance":"shorter"}"#).unwrap();
        assert_eq!(rejected, Feedback::rejected("shorter"));
    }

    // ─── RefineConfig ───────────────────────────────────────────

    #[test]
    fn test_refine_config_defaults() {
        let cfg = RefineConfig::default();
        assert_eq!(cfg.max_iterations, 3);
        assert_eq!(cfg.call_timeout, Duration::from_secs(120));
    }

    #[test]
    fn test_refine_config_from_section() {
        let section = RefineSection {
            max_iterations: 5,
            call_timeout_seconds: 30,
        };
        let cfg = RefineConfig::from(&section);
        assert_eq!(cfg.max_iterations, 5);
        assert_eq!(cfg.call_timeout, Duration::from_secs(30));
    }
}
