// src/infra/config.rs — Configuration loading (TOML)

use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub models: ModelsConfig,

    #[serde(default)]
    pub refine: RefineSection,

    #[serde(default)]
    pub pipeline: PipelineSection,
}

/// Model assignment per pipeline role, "provider/model" format.
/// Unset roles fall back to the defaults in `PipelineRoles`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelsConfig {
    pub planner: Option<String>,
    pub outliner: Option<String>,
    pub enricher: Option<String>,
    pub evaluator: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefineSection {
    pub max_iterations: u32,
    pub call_timeout_seconds: u64,
}

impl Default for RefineSection {
    fn default() -> Self {
        Self {
            max_iterations: 3,
            call_timeout_seconds: 120,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSection {
    /// How many topic refine loops may run at once.
    pub max_parallel_topics: usize,
    /// Max output tokens requested from generation calls.
    pub max_output_tokens: u32,
}

impl Default for PipelineSection {
    fn default() -> Self {
        Self {
            max_parallel_topics: 8,
            max_output_tokens: 8192,
        }
    }
}

impl Config {
    /// Load `courseforge.toml` from the working directory, falling back to defaults.
    pub fn load() -> anyhow::Result<Self> {
        let path = Path::new("courseforge.toml");
        if path.exists() {
            Self::load_from(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_reasonable() {
        let c = Config::default();
        assert_eq!(c.refine.max_iterations, 3);
        assert_eq!(c.refine.call_timeout_seconds, 120);
        assert_eq!(c.pipeline.max_parallel_topics, 8);
        assert_eq!(c.pipeline.max_output_tokens, 8192);
        assert!(c.models.planner.is_none());
    }

    #[test]
    fn test_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.refine.max_iterations, 3);
    }

    #[test]
    fn test_parse_full_toml() {
        let toml_str = r#"
[models]
planner = "anthropic/claude-sonnet-4-20250514"
outliner = "google/gemini-2.5-pro"
enricher = "google/gemini-2.5-flash"
evaluator = "anthropic/claude-sonnet-4-20250514"

[refine]
max_iterations = 5
call_timeout_seconds = 60

[pipeline]
max_parallel_topics = 4
max_output_tokens = 4096
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.refine.max_iterations, 5);
        assert_eq!(config.refine.call_timeout_seconds, 60);
        assert_eq!(config.pipeline.max_parallel_topics, 4);
        assert_eq!(
            config.models.outliner,
            Some("google/gemini-2.5-pro".into())
        );
        assert_eq!(
            config.models.planner,
            Some("anthropic/claude-sonnet-4-20250514".into())
        );
    }

    #[test]
    fn test_parse_partial_toml() {
        let toml_str = r#"
[refine]
max_iterations = 1
call_timeout_seconds = 30
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.refine.max_iterations, 1);
        assert_eq!(config.pipeline.max_parallel_topics, 8);
    }

    #[test]
    fn test_serialize_roundtrip() {
        let config = Config::default();
        let serialized = toml::to_string(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(
            deserialized.refine.max_iterations,
            config.refine.max_iterations
        );
        assert_eq!(
            deserialized.pipeline.max_parallel_topics,
            config.pipeline.max_parallel_topics
        );
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = Config::load_from(Path::new("/nonexistent/courseforge.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_tempfile() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("courseforge.toml");
        std::fs::write(&path, "[refine]\nmax_iterations = 7\ncall_timeout_seconds = 10\n")
            .unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.refine.max_iterations, 7);
    }
}
