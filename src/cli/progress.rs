// src/cli/progress.rs — Terminal progress renderer

use crate::core::types::ProgressEvent;
use crate::util::truncate_str;

/// Build a progress callback that writes formatted output to stderr.
///
/// All progress output goes to stderr so stdout remains clean for the
/// generated artifacts.
pub fn terminal_progress() -> impl Fn(ProgressEvent) + Send + Sync + 'static {
    move |event| match event {
        ProgressEvent::StageChanged { stage } => {
            eprintln!("[stage] {}", stage);
        }
        ProgressEvent::GenerationStart {
            topic,
            iteration,
            max_iterations,
        } => {
            eprintln!(
                "[{}] iter {}/{} generating...",
                truncate_str(&topic, 40),
                iteration,
                max_iterations,
            );
        }
        ProgressEvent::CandidateReady {
            topic,
            iteration,
            chars,
        } => {
            eprintln!(
                "[{}] iter {} candidate ready ({} chars)",
                truncate_str(&topic, 40),
                iteration,
                chars,
            );
        }
        ProgressEvent::Rejected {
            topic,
            iteration,
            guidance,
        } => {
            eprintln!(
                "[{}] iter {} rejected: {}",
                truncate_str(&topic, 40),
                iteration,
                truncate_str(&guidance, 120),
            );
        }
        ProgressEvent::Accepted {
            topic,
            iterations,
            total_tokens,
        } => {
            eprintln!(
                "[{}] accepted after {} iteration(s), {} tokens",
                truncate_str(&topic, 40),
                iterations,
                total_tokens,
            );
        }
        ProgressEvent::TopicSkipped { topic, reason } => {
            eprintln!(
                "[{}] skipped: {}",
                truncate_str(&topic, 40),
                truncate_str(&reason, 120),
            );
        }
    }
}
