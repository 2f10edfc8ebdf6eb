// src/infra/errors.rs — Error types for courseforge

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CourseForgeError {
    // Provider errors (retriable)
    #[error("Provider '{provider}' error: {message}")]
    Provider {
        provider: String,
        message: String,
        retriable: bool,
    },

    #[error("Rate limited by '{provider}', retry after {retry_after_ms}ms")]
    RateLimited {
        provider: String,
        retry_after_ms: u64,
    },

    // Refine loop errors (terminal for the invocation)
    #[error("Generation call failed: {source}")]
    Generation {
        #[source]
        source: Box<CourseForgeError>,
    },

    #[error("Evaluation call failed: {source}")]
    Evaluation {
        #[source]
        source: Box<CourseForgeError>,
    },

    #[error("No accepted candidate after {iterations} iteration(s)")]
    IterationLimitExceeded { iterations: u32 },

    #[error("{phase} call timed out after {timeout_ms}ms")]
    CallTimeout { phase: &'static str, timeout_ms: u64 },

    #[error("Malformed {expected} response: {message}")]
    MalformedResponse {
        expected: &'static str,
        message: String,
    },

    // User errors
    #[error("No provider configured. Set ANTHROPIC_API_KEY or GEMINI_API_KEY.")]
    NoProvider,

    #[error("No provider available for model '{model_ref}'")]
    ProviderNotAvailable { model_ref: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CourseForgeError {
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            CourseForgeError::Provider {
                retriable: true,
                ..
            } | CourseForgeError::RateLimited { .. }
        )
    }

    /// Wrap a capability failure as a generation-phase error.
    pub fn generation(source: CourseForgeError) -> Self {
        CourseForgeError::Generation {
            source: Box::new(source),
        }
    }

    /// Wrap a capability failure as an evaluation-phase error.
    pub fn evaluation(source: CourseForgeError) -> Self {
        CourseForgeError::Evaluation {
            source: Box::new(source),
        }
    }
}
