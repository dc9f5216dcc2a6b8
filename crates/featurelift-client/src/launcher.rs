//! Local job launcher contract
//!
//! In local mode the client hands resolved inputs straight to a job-launching
//! library running in this process. Submission is synchronous-return,
//! asynchronous-execution: the call returns once the job is accepted, not
//! once it completes. Only the contract lives here.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use featurelift_core::{EntitySource, FeatureRef, FeatureTable, FileFormat, Result};

use crate::job::{JobHandle, RetrievalJobHandle};

/// Fully resolved inputs of a historical retrieval submission
///
/// Produced by the client after resolution, precondition checks and staging;
/// consumed unchanged by either execution backend.
#[derive(Debug, Clone)]
pub struct RetrievalJobSpec {
    pub feature_refs: Vec<FeatureRef>,

    /// Resolved definitions, pruned to the requested features
    pub feature_tables: Vec<FeatureTable>,

    /// Entity rows, already staged to a backend-readable location
    pub entity_source: EntitySource,

    pub project: String,
    pub output_format: FileFormat,
    pub output_location: String,
}

/// Contract of the library that executes jobs in-process
///
/// # Errors
///
/// `get_job_by_id` fails with `JobNotFound` for ids the launcher has never
/// seen; other failures surface as launcher-specific errors unchanged.
#[async_trait]
pub trait JobLauncher: Send + Sync {
    /// Launches a historical retrieval job from fully resolved inputs
    async fn start_retrieval_job(
        &self,
        spec: RetrievalJobSpec,
    ) -> Result<Box<dyn RetrievalJobHandle>>;

    /// Launches batch-to-online ingestion over `[start, end)`
    async fn start_batch_ingestion_job(
        &self,
        project: &str,
        table: &FeatureTable,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Box<dyn JobHandle>>;

    /// Launches stream-to-online ingestion, optionally with extra runtime
    /// dependencies
    async fn start_stream_ingestion_job(
        &self,
        project: &str,
        table: &FeatureTable,
        extra_jars: &[String],
    ) -> Result<Box<dyn JobHandle>>;

    /// Enumerates jobs known to the launcher
    async fn list_jobs(
        &self,
        include_terminated: bool,
        table_name: Option<&str>,
    ) -> Result<Vec<Box<dyn JobHandle>>>;

    /// Looks up a job by id
    async fn get_job_by_id(&self, job_id: &str) -> Result<Box<dyn JobHandle>>;
}
