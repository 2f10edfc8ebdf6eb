// src/core/mod.rs — Refine loop core

pub mod refine;
pub mod types;
