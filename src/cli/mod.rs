// src/cli/mod.rs — CLI definition (clap derive)

pub mod draft;
pub mod generate;
pub mod models;
pub mod progress;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "courseforge",
    about = "Course generation driven by a generate-evaluate-refine loop",
    version
)]
pub struct Cli {
    /// Config file path (defaults to ./courseforge.toml when present)
    #[arg(long)]
    pub config: Option<String>,

    /// Suppress progress output (only emit the final result)
    #[arg(long)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate course plans from a document
    Generate {
        /// Input document: JSON {introduction, main_content, conclusion}
        /// or plain text split by paragraphs
        input: PathBuf,

        /// Write the course plan JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Draft a single prose artifact for a topic through the refine loop
    Draft {
        /// The topic to draft about
        topic: String,

        /// Max refine iterations (overrides config)
        #[arg(short, long)]
        iterations: Option<u32>,

        /// Model to use for both generation and evaluation (provider/model)
        #[arg(short, long)]
        model: Option<String>,
    },

    /// List available providers and their models
    Models,
}
