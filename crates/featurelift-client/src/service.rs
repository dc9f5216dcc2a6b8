//! Control-plane job service contract
//!
//! Request and response shapes of the five RPCs the client consumes, plus the
//! [`JobService`] trait that transports implement. The wire encoding beyond
//! these shapes belongs to the transport; see [`crate::http`] for the
//! provided HTTP/JSON client.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use featurelift_core::{EntitySource, JobKind, JobStatus, Result};
use serde::{Deserialize, Serialize};

/// Submit a historical feature retrieval job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetHistoricalFeaturesRequest {
    /// Feature references in `table:feature` form
    pub feature_refs: Vec<String>,

    /// Already-staged source of the entity rows
    pub entity_source: EntitySource,

    pub project: String,
    pub output_format: String,
    pub output_location: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetHistoricalFeaturesResponse {
    pub id: String,
    pub output_file_uri: String,
    pub job_start_time: DateTime<Utc>,
    #[serde(default)]
    pub log_uri: Option<String>,
}

/// Submit a batch-to-online ingestion job over a half-open time window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartOfflineToOnlineIngestionJobRequest {
    pub project: String,
    pub table_name: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

/// Submit a stream-to-online ingestion job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartStreamToOnlineIngestionJobRequest {
    pub project: String,
    pub table_name: String,
}

/// Response shape shared by both ingestion submissions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionJobResponse {
    pub id: String,
    pub job_start_time: DateTime<Utc>,
    #[serde(default)]
    pub log_uri: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListJobsRequest {
    pub include_terminated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListJobsResponse {
    pub jobs: Vec<JobDescriptor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetJobRequest {
    pub job_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetJobResponse {
    pub job: JobDescriptor,
}

/// Job as described by the control plane
///
/// The `kind` discriminant decides which handle variant a descriptor maps to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobDescriptor {
    pub id: String,
    pub kind: JobKind,
    pub status: JobStatus,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub log_uri: Option<String>,
    /// Feature table the job ingests; absent for retrieval jobs
    #[serde(default)]
    pub table_name: Option<String>,
    /// Output location; present only for retrieval jobs
    #[serde(default)]
    pub output_file_uri: Option<String>,
}

/// RPC surface of the control-plane job service
///
/// One request per call; implementations must be safe for concurrent use and
/// must bound every call with the configured timeout rather than hang. The
/// client performs no retries on top of this trait.
#[async_trait]
pub trait JobService: Send + Sync + std::fmt::Debug {
    async fn get_historical_features(
        &self,
        request: GetHistoricalFeaturesRequest,
    ) -> Result<GetHistoricalFeaturesResponse>;

    async fn start_offline_to_online_ingestion_job(
        &self,
        request: StartOfflineToOnlineIngestionJobRequest,
    ) -> Result<IngestionJobResponse>;

    async fn start_stream_to_online_ingestion_job(
        &self,
        request: StartStreamToOnlineIngestionJobRequest,
    ) -> Result<IngestionJobResponse>;

    async fn list_jobs(&self, request: ListJobsRequest) -> Result<ListJobsResponse>;

    /// Fetches one job by id
    ///
    /// # Errors
    ///
    /// - `JobNotFound` carrying the requested id when the job is unknown
    async fn get_job(&self, request: GetJobRequest) -> Result<GetJobResponse>;
}
