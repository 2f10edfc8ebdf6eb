// src/cli/draft.rs — `draft` command: one topic through the refine loop

use std::sync::Arc;

use anyhow::Context;

use crate::cli::progress::terminal_progress;
use crate::core::refine::RefineLoop;
use crate::core::types::{RefineConfig, Topic};
use crate::draft::{ProseEvaluator, ProseGenerator};
use crate::infra::config::Config;
use crate::provider::resolver;
use crate::provider::roles::PipelineRoles;
use crate::provider::ModelRef;

pub async fn run(
    topic: &str,
    iterations: Option<u32>,
    model: Option<&str>,
    config: &Config,
    quiet: bool,
) -> anyhow::Result<()> {
    let providers = resolver::discover_providers();

    let model_ref = match model {
        Some(raw) => ModelRef::parse(raw)
            .with_context(|| format!("invalid model reference '{}', expected provider/model", raw))?,
        None => PipelineRoles::from_config(&config.models).planner,
    };
    let provider = resolver::provider_for(&providers, &model_ref)?;

    let mut refine_config = RefineConfig::from(&config.refine);
    if let Some(n) = iterations {
        refine_config.max_iterations = n;
    }

    let generator = ProseGenerator::new(provider.clone(), model_ref.model.clone());
    let evaluator = ProseEvaluator::new(provider, model_ref.model.clone());
    let mut refine = RefineLoop::new(Arc::new(generator), Arc::new(evaluator), refine_config);
    if !quiet {
        refine = refine.with_progress(terminal_progress());
    }

    let outcome = refine.run(Topic::new(topic)).await?;
    eprintln!(
        "Accepted after {} iteration(s), {} tokens",
        outcome.iterations,
        outcome.usage.total(),
    );
    println!("{}", outcome.candidate.content);
    Ok(())
}
