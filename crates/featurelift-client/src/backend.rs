//! Execution backends
//!
//! The local/remote mode branch, lifted out of the individual operations into
//! one strategy object chosen at client construction. Both backends expose
//! the same submission interface and return handles with identical behavior;
//! the caller cannot tell from a handle which backend produced it.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use featurelift_core::{FeatureTable, Result};

use crate::job::{JobHandle, RetrievalJobHandle};
use crate::launcher::{JobLauncher, RetrievalJobSpec};
use crate::remote::{
    remote_job_from_descriptor, RemoteBatchIngestionJob, RemoteRetrievalJob,
    RemoteStreamIngestionJob,
};
use crate::service::{
    GetHistoricalFeaturesRequest, GetJobRequest, JobService, ListJobsRequest,
    StartOfflineToOnlineIngestionJobRequest, StartStreamToOnlineIngestionJobRequest,
};

/// Uniform submission interface over the two execution modes
#[async_trait]
pub trait ExecutionBackend: Send + Sync {
    async fn submit_retrieval(
        &self,
        spec: RetrievalJobSpec,
    ) -> Result<Box<dyn RetrievalJobHandle>>;

    async fn submit_batch_ingestion(
        &self,
        project: &str,
        table: &FeatureTable,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Box<dyn JobHandle>>;

    async fn submit_stream_ingestion(
        &self,
        project: &str,
        table: &FeatureTable,
        extra_jars: &[String],
    ) -> Result<Box<dyn JobHandle>>;

    async fn list_jobs(
        &self,
        include_terminated: bool,
        table_name: Option<&str>,
    ) -> Result<Vec<Box<dyn JobHandle>>>;

    async fn get_job(&self, job_id: &str) -> Result<Box<dyn JobHandle>>;
}

/// Executes jobs in-process through the job-launching library
pub struct LocalBackend {
    launcher: Arc<dyn JobLauncher>,
}

impl LocalBackend {
    pub fn new(launcher: Arc<dyn JobLauncher>) -> Self {
        Self { launcher }
    }
}

#[async_trait]
impl ExecutionBackend for LocalBackend {
    async fn submit_retrieval(
        &self,
        spec: RetrievalJobSpec,
    ) -> Result<Box<dyn RetrievalJobHandle>> {
        self.launcher.start_retrieval_job(spec).await
    }

    async fn submit_batch_ingestion(
        &self,
        project: &str,
        table: &FeatureTable,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Box<dyn JobHandle>> {
        self.launcher
            .start_batch_ingestion_job(project, table, start, end)
            .await
    }

    async fn submit_stream_ingestion(
        &self,
        project: &str,
        table: &FeatureTable,
        extra_jars: &[String],
    ) -> Result<Box<dyn JobHandle>> {
        self.launcher
            .start_stream_ingestion_job(project, table, extra_jars)
            .await
    }

    async fn list_jobs(
        &self,
        include_terminated: bool,
        table_name: Option<&str>,
    ) -> Result<Vec<Box<dyn JobHandle>>> {
        self.launcher.list_jobs(include_terminated, table_name).await
    }

    async fn get_job(&self, job_id: &str) -> Result<Box<dyn JobHandle>> {
        self.launcher.get_job_by_id(job_id).await
    }
}

/// Submits jobs to the control-plane job service over RPC
///
/// Holds the one shared service client; responses are wrapped into remote
/// handle variants that poll status through the same client.
pub struct RemoteBackend {
    service: Arc<dyn JobService>,
}

impl RemoteBackend {
    pub fn new(service: Arc<dyn JobService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl ExecutionBackend for RemoteBackend {
    async fn submit_retrieval(
        &self,
        spec: RetrievalJobSpec,
    ) -> Result<Box<dyn RetrievalJobHandle>> {
        let request = GetHistoricalFeaturesRequest {
            feature_refs: spec.feature_refs.iter().map(|r| r.to_string()).collect(),
            entity_source: spec.entity_source,
            project: spec.project,
            output_format: spec.output_format.to_string(),
            output_location: spec.output_location,
        };

        let response = self.service.get_historical_features(request).await?;
        Ok(Box::new(RemoteRetrievalJob::new(
            self.service.clone(),
            response.id,
            response.output_file_uri,
            response.job_start_time,
            response.log_uri,
        )))
    }

    async fn submit_batch_ingestion(
        &self,
        project: &str,
        table: &FeatureTable,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Box<dyn JobHandle>> {
        let request = StartOfflineToOnlineIngestionJobRequest {
            project: project.to_string(),
            table_name: table.name.clone(),
            start_date: start,
            end_date: end,
        };

        let response = self
            .service
            .start_offline_to_online_ingestion_job(request)
            .await?;
        Ok(Box::new(RemoteBatchIngestionJob::new(
            self.service.clone(),
            response.id,
            table.name.clone(),
            response.job_start_time,
            response.log_uri,
        )))
    }

    async fn submit_stream_ingestion(
        &self,
        project: &str,
        table: &FeatureTable,
        _extra_jars: &[String],
    ) -> Result<Box<dyn JobHandle>> {
        let request = StartStreamToOnlineIngestionJobRequest {
            project: project.to_string(),
            table_name: table.name.clone(),
        };

        let response = self
            .service
            .start_stream_to_online_ingestion_job(request)
            .await?;
        Ok(Box::new(RemoteStreamIngestionJob::new(
            self.service.clone(),
            response.id,
            table.name.clone(),
            response.job_start_time,
            response.log_uri,
        )))
    }

    async fn list_jobs(
        &self,
        include_terminated: bool,
        table_name: Option<&str>,
    ) -> Result<Vec<Box<dyn JobHandle>>> {
        let request = ListJobsRequest {
            include_terminated,
            table_name: table_name.map(|t| t.to_string()),
        };

        let response = self.service.list_jobs(request).await?;
        Ok(response
            .jobs
            .into_iter()
            .map(|descriptor| remote_job_from_descriptor(self.service.clone(), descriptor))
            .collect())
    }

    async fn get_job(&self, job_id: &str) -> Result<Box<dyn JobHandle>> {
        let response = self
            .service
            .get_job(GetJobRequest {
                job_id: job_id.to_string(),
            })
            .await?;
        Ok(remote_job_from_descriptor(self.service.clone(), response.job))
    }
}
