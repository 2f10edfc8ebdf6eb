// src/lib.rs — Library root for courseforge

pub mod cli;
pub mod core;
pub mod course;
pub mod draft;
pub mod infra;
pub mod provider;
pub mod util;
