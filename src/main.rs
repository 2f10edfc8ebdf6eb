// src/main.rs — CourseForge entry point

use clap::Parser;

use courseforge::cli::{Cli, Commands};
use courseforge::infra::config::Config;
use courseforge::infra::logger;

#[tokio::main]
async fn main() {
    // Initialize logging (respects COURSEFORGE_LOG / RUST_LOG)
    logger::init_logging("warn");

    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load config (falls back to defaults if no courseforge.toml)
    let config = if let Some(ref path) = cli.config {
        Config::load_from(std::path::Path::new(path))?
    } else {
        Config::load()?
    };

    match cli.command {
        Commands::Generate { input, output } => {
            courseforge::cli::generate::run(&input, output.as_deref(), &config, cli.quiet).await
        }
        Commands::Draft {
            topic,
            iterations,
            model,
        } => {
            courseforge::cli::draft::run(&topic, iterations, model.as_deref(), &config, cli.quiet)
                .await
        }
        Commands::Models => {
            courseforge::cli::models::run();
            Ok(())
        }
    }
}
