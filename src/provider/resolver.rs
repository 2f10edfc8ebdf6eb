// src/provider/resolver.rs — Provider discovery from environment

use std::sync::Arc;

use super::anthropic::AnthropicProvider;
use super::google::GoogleProvider;
use super::{ModelProvider, ModelRef};
use crate::infra::errors::CourseForgeError;

/// Discover providers from API keys in the environment.
///
/// ANTHROPIC_API_KEY enables the Anthropic provider; GEMINI_API_KEY (or
/// GOOGLE_API_KEY) enables Gemini.
pub fn discover_providers() -> Vec<Arc<dyn ModelProvider>> {
    let mut providers: Vec<Arc<dyn ModelProvider>> = Vec::new();

    if let Ok(key) = std::env::var("ANTHROPIC_API_KEY") {
        if !key.is_empty() {
            providers.push(Arc::new(AnthropicProvider::new(key)));
        }
    }

    let google_key = std::env::var("GEMINI_API_KEY")
        .or_else(|_| std::env::var("GOOGLE_API_KEY"))
        .unwrap_or_default();
    if !google_key.is_empty() {
        providers.push(Arc::new(GoogleProvider::new(google_key)));
    }

    tracing::debug!(count = providers.len(), "discovered providers");
    providers
}

/// Find the provider that serves a model reference.
pub fn provider_for(
    providers: &[Arc<dyn ModelProvider>],
    model_ref: &ModelRef,
) -> Result<Arc<dyn ModelProvider>, CourseForgeError> {
    if providers.is_empty() {
        return Err(CourseForgeError::NoProvider);
    }
    providers
        .iter()
        .find(|p| p.id() == model_ref.provider)
        .cloned()
        .ok_or_else(|| CourseForgeError::ProviderNotAvailable {
            model_ref: model_ref.to_string(),
        })
}
