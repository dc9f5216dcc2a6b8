//! Remote job handle variants
//!
//! Handles over jobs owned by the control-plane job service. Identity, start
//! time and log location are captured from the submission response; status is
//! polled through the shared [`JobService`] on demand.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use featurelift_core::{JobKind, JobStatus, Result};

use crate::job::{JobHandle, RetrievalJobHandle};
use crate::service::{GetJobRequest, JobDescriptor, JobService};

async fn fetch_status(service: &dyn JobService, job_id: &str) -> Result<JobStatus> {
    let response = service
        .get_job(GetJobRequest {
            job_id: job_id.to_string(),
        })
        .await?;
    Ok(response.job.status)
}

/// Historical retrieval job running under the control plane
#[derive(Debug)]
pub struct RemoteRetrievalJob {
    service: Arc<dyn JobService>,
    id: String,
    output_file_uri: String,
    start_time: DateTime<Utc>,
    log_uri: Option<String>,
}

impl RemoteRetrievalJob {
    pub fn new(
        service: Arc<dyn JobService>,
        id: impl Into<String>,
        output_file_uri: impl Into<String>,
        start_time: DateTime<Utc>,
        log_uri: Option<String>,
    ) -> Self {
        Self {
            service,
            id: id.into(),
            output_file_uri: output_file_uri.into(),
            start_time,
            log_uri,
        }
    }
}

#[async_trait]
impl JobHandle for RemoteRetrievalJob {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> JobKind {
        JobKind::HistoricalRetrieval
    }

    async fn status(&self) -> Result<JobStatus> {
        fetch_status(self.service.as_ref(), &self.id).await
    }

    fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    fn log_uri(&self) -> Option<&str> {
        self.log_uri.as_deref()
    }
}

#[async_trait]
impl RetrievalJobHandle for RemoteRetrievalJob {
    fn output_file_uri(&self) -> &str {
        &self.output_file_uri
    }
}

/// Batch-to-online ingestion job running under the control plane
#[derive(Debug)]
pub struct RemoteBatchIngestionJob {
    service: Arc<dyn JobService>,
    id: String,
    table_name: String,
    start_time: DateTime<Utc>,
    log_uri: Option<String>,
}

impl RemoteBatchIngestionJob {
    pub fn new(
        service: Arc<dyn JobService>,
        id: impl Into<String>,
        table_name: impl Into<String>,
        start_time: DateTime<Utc>,
        log_uri: Option<String>,
    ) -> Self {
        Self {
            service,
            id: id.into(),
            table_name: table_name.into(),
            start_time,
            log_uri,
        }
    }

    /// Feature table this job ingests
    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

#[async_trait]
impl JobHandle for RemoteBatchIngestionJob {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> JobKind {
        JobKind::BatchIngestion
    }

    async fn status(&self) -> Result<JobStatus> {
        fetch_status(self.service.as_ref(), &self.id).await
    }

    fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    fn log_uri(&self) -> Option<&str> {
        self.log_uri.as_deref()
    }
}

/// Stream-to-online ingestion job running under the control plane
#[derive(Debug)]
pub struct RemoteStreamIngestionJob {
    service: Arc<dyn JobService>,
    id: String,
    table_name: String,
    start_time: DateTime<Utc>,
    log_uri: Option<String>,
}

impl RemoteStreamIngestionJob {
    pub fn new(
        service: Arc<dyn JobService>,
        id: impl Into<String>,
        table_name: impl Into<String>,
        start_time: DateTime<Utc>,
        log_uri: Option<String>,
    ) -> Self {
        Self {
            service,
            id: id.into(),
            table_name: table_name.into(),
            start_time,
            log_uri,
        }
    }

    /// Feature table this job ingests
    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

#[async_trait]
impl JobHandle for RemoteStreamIngestionJob {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> JobKind {
        JobKind::StreamIngestion
    }

    async fn status(&self) -> Result<JobStatus> {
        fetch_status(self.service.as_ref(), &self.id).await
    }

    fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    fn log_uri(&self) -> Option<&str> {
        self.log_uri.as_deref()
    }
}

/// Builds the matching remote handle variant for a job descriptor
///
/// The single construction point for handles recovered from `ListJobs` and
/// `GetJob` responses, keyed on the descriptor's kind discriminant.
pub fn remote_job_from_descriptor(
    service: Arc<dyn JobService>,
    descriptor: JobDescriptor,
) -> Box<dyn JobHandle> {
    match descriptor.kind {
        JobKind::HistoricalRetrieval => Box::new(RemoteRetrievalJob::new(
            service,
            descriptor.id,
            descriptor.output_file_uri.unwrap_or_default(),
            descriptor.start_time,
            descriptor.log_uri,
        )),
        JobKind::BatchIngestion => Box::new(RemoteBatchIngestionJob::new(
            service,
            descriptor.id,
            descriptor.table_name.unwrap_or_default(),
            descriptor.start_time,
            descriptor.log_uri,
        )),
        JobKind::StreamIngestion => Box::new(RemoteStreamIngestionJob::new(
            service,
            descriptor.id,
            descriptor.table_name.unwrap_or_default(),
            descriptor.start_time,
            descriptor.log_uri,
        )),
    }
}
