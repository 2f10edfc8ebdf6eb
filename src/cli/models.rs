// src/cli/models.rs — `models` command: list available providers and models

use crate::provider::resolver;

pub fn run() {
    let providers = resolver::discover_providers();
    if providers.is_empty() {
        println!("No providers available. Set ANTHROPIC_API_KEY or GEMINI_API_KEY.");
        return;
    }

    for provider in providers {
        println!("{} ({})", provider.name(), provider.id());
        for model in provider.models() {
            println!(
                "  {}/{}  ctx {}k, out {}k, ${:.2}/${:.2} per Mtok",
                provider.id(),
                model.id,
                model.context_window / 1000,
                model.max_output_tokens / 1000,
                model.input_price_per_mtok,
                model.output_price_per_mtok,
            );
        }
    }
}
