//! CLI command implementations

pub mod jobs;
