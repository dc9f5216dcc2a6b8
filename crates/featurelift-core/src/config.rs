//! Client configuration handling
//!
//! A flat configuration read once per client construction. The job-service
//! section decides the execution mode: when `job_service.url` is set every
//! operation is submitted over RPC, otherwise jobs are launched locally.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::types::FileFormat;
use crate::{Error, Result};

/// Top-level client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Feature-store project scoping table lookups and job submissions
    #[serde(default = "default_project")]
    pub project: String,

    /// Control-plane job service; absence of a URL selects local mode
    #[serde(default)]
    pub job_service: JobServiceConfig,

    /// Staging area for in-memory entity datasets
    #[serde(default)]
    pub staging: StagingConfig,

    /// Defaults for historical retrieval output
    #[serde(default)]
    pub historical_output: HistoricalOutputConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            project: default_project(),
            job_service: JobServiceConfig::default(),
            staging: StagingConfig::default(),
            historical_output: HistoricalOutputConfig::default(),
        }
    }
}

impl ClientConfig {
    /// True when the job-service URL is configured
    ///
    /// This is the only mode switch; there is no per-call override.
    pub fn remote_mode(&self) -> bool {
        self.job_service.url.is_some()
    }
}

/// Connection settings for the control-plane job service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobServiceConfig {
    /// Base URL of the job service (e.g. "https://jobs.internal:6568")
    #[serde(default)]
    pub url: Option<String>,

    /// Verify the server against a custom CA certificate
    #[serde(default)]
    pub tls_enabled: bool,

    /// Path to a PEM CA certificate, used when TLS is enabled
    #[serde(default)]
    pub tls_cert_path: Option<String>,

    /// Send a bearer token with every request
    #[serde(default)]
    pub auth_enabled: bool,

    /// Token presented when auth is enabled
    #[serde(default)]
    pub auth_token: Option<String>,

    /// Per-request timeout; an expired deadline surfaces as a Timeout error
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout_seconds: u64,
}

impl Default for JobServiceConfig {
    fn default() -> Self {
        Self {
            url: None,
            tls_enabled: false,
            tls_cert_path: None,
            auth_enabled: false,
            auth_token: None,
            connection_timeout_seconds: default_connection_timeout(),
        }
    }
}

/// Staging area for in-memory entity datasets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StagingConfig {
    /// Base URI under which entity files are written, one fresh path per call
    #[serde(default = "default_staging_location")]
    pub location: String,
}

impl Default for StagingConfig {
    fn default() -> Self {
        Self {
            location: default_staging_location(),
        }
    }
}

/// Where historical retrieval jobs write their output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalOutputConfig {
    /// Base path; each submission appends a fresh unique suffix
    #[serde(default = "default_output_location")]
    pub location: String,

    /// Output file format
    #[serde(default = "default_output_format")]
    pub format: FileFormat,
}

impl Default for HistoricalOutputConfig {
    fn default() -> Self {
        Self {
            location: default_output_location(),
            format: default_output_format(),
        }
    }
}

fn default_project() -> String {
    "default".to_string()
}

fn default_connection_timeout() -> u64 {
    10
}

fn default_staging_location() -> String {
    "file:///tmp/featurelift/staging".to_string()
}

fn default_output_location() -> String {
    "file:///tmp/featurelift/output".to_string()
}

fn default_output_format() -> FileFormat {
    FileFormat::Parquet
}

/// Load configuration from an explicit file, a default location, or defaults
pub fn load_config(config_path: Option<&str>) -> Result<ClientConfig> {
    if let Some(path) = config_path {
        return load_from_file(path);
    }

    let default_locations = [
        ".featurelift/config.yaml",
        ".featurelift/config.yml",
        "featurelift.yaml",
        "featurelift.yml",
    ];

    for location in default_locations {
        if Path::new(location).exists() {
            tracing::debug!(path = location, "Loading configuration");
            return load_from_file(location);
        }
    }

    Ok(ClientConfig::default())
}

fn load_from_file(path: &str) -> Result<ClientConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::config(format!("Failed to read config file {path}: {e}")))?;

    if path.ends_with(".json") {
        serde_json::from_str(&content)
            .map_err(|e| Error::config(format!("Failed to parse JSON config {path}: {e}")))
    } else {
        serde_yaml::from_str(&content)
            .map_err(|e| Error::config(format!("Failed to parse YAML config {path}: {e}")))
    }
}
