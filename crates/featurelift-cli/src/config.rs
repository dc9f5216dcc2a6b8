//! CLI configuration handling
//!
//! Thin wrapper over the library configuration: load from file (or default
//! locations), then apply command-line overrides.

use anyhow::{Context, Result};
use featurelift_core::ClientConfig;

/// Load configuration and apply CLI overrides
pub fn load(config_path: Option<&str>, job_service_url: Option<&str>) -> Result<ClientConfig> {
    let mut config =
        featurelift_core::load_config(config_path).context("Failed to load configuration")?;

    if let Some(url) = job_service_url {
        config.job_service.url = Some(url.to_string());
    }

    Ok(config)
}
