// src/cli/generate.rs — `generate` command: document in, course plan out

use std::path::Path;

use anyhow::Context;

use crate::cli::progress::terminal_progress;
use crate::course::types::DocumentInput;
use crate::course::CoursePipeline;
use crate::infra::config::Config;
use crate::provider::resolver;
use crate::provider::roles::PipelineRoles;

pub async fn run(
    input: &Path,
    output: Option<&Path>,
    config: &Config,
    quiet: bool,
) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(input)
        .with_context(|| format!("reading input document {}", input.display()))?;
    let doc = DocumentInput::parse(&raw);

    let providers = resolver::discover_providers();
    let roles = PipelineRoles::from_config(&config.models);

    let mut pipeline = CoursePipeline::new(&providers, &roles, config)?;
    if !quiet {
        pipeline = pipeline.with_progress(terminal_progress());
    }

    let plan = pipeline.run(&doc).await?;

    let json = serde_json::to_string_pretty(&plan)?;
    match output {
        Some(path) => {
            std::fs::write(path, &json)
                .with_context(|| format!("writing course plan to {}", path.display()))?;
            eprintln!(
                "Wrote {} course(s) ({} skipped) to {}",
                plan.courses.len(),
                plan.skipped.len(),
                path.display(),
            );
        }
        None => println!("{}", json),
    }
    Ok(())
}
