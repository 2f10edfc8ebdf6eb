// src/infra/logger.rs — Structured logging with tracing

use tracing_subscriber::{fmt, EnvFilter};

/// Resolve the log filter: COURSEFORGE_LOG wins over RUST_LOG, the given
/// level is the fallback when neither is set.
fn resolve_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_env("COURSEFORGE_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(level))
}

pub fn init_logging(level: &str) {
    fmt()
        .with_env_filter(resolve_filter(level))
        .with_target(false)
        .compact()
        .init();
}
