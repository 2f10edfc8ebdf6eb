// src/provider/roles.rs — Role-based model assignment

use super::ModelRef;
use crate::infra::config::ModelsConfig;

/// Assigns models to the pipeline roles.
///
/// Defaults mirror the production assignment: Claude for planning and
/// evaluation, Gemini Pro for outlining, Gemini Flash for enrichment.
#[derive(Debug, Clone)]
pub struct PipelineRoles {
    pub planner: ModelRef,
    pub outliner: ModelRef,
    pub enricher: ModelRef,
    pub evaluator: ModelRef,
}

impl Default for PipelineRoles {
    fn default() -> Self {
        Self {
            planner: ModelRef::new("anthropic", "claude-sonnet-4-20250514"),
            outliner: ModelRef::new("google", "gemini-2.5-pro"),
            enricher: ModelRef::new("google", "gemini-2.5-flash"),
            evaluator: ModelRef::new("anthropic", "claude-sonnet-4-20250514"),
        }
    }
}

impl PipelineRoles {
    /// Build from config, filling unset roles with the defaults.
    pub fn from_config(models: &ModelsConfig) -> Self {
        let defaults = Self::default();
        Self {
            planner: models
                .planner
                .as_deref()
                .and_then(ModelRef::parse)
                .unwrap_or(defaults.planner),
            outliner: models
                .outliner
                .as_deref()
                .and_then(ModelRef::parse)
                .unwrap_or(defaults.outliner),
            enricher: models
                .enricher
                .as_deref()
                .and_then(ModelRef::parse)
                .unwrap_or(defaults.enricher),
            evaluator: models
                .evaluator
                .as_deref()
                .and_then(ModelRef::parse)
                .unwrap_or(defaults.evaluator),
        }
    }

    /// Use one model for every role. Useful for tests and single-provider setups.
    pub fn from_single(model: ModelRef) -> Self {
        Self {
            planner: model.clone(),
            outliner: model.clone(),
            enricher: model.clone(),
            evaluator: model,
        }
    }
}
