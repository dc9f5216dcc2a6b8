//! The FeatureLift client facade
//!
//! One entry point for submitting and tracking feature-engineering jobs.
//! Each call resolves its inputs, runs precondition checks, stages entity
//! data when needed, and hands the prepared submission to the execution
//! backend chosen at construction time. The client keeps no state between
//! calls beyond its configuration and collaborators, so a single instance
//! can be shared freely across tasks.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use featurelift_core::{
    ClientConfig, EntityDataset, EntitySource, Error, FeatureRef, FeatureTable, Result,
    EVENT_TIMESTAMP_COLUMN,
};
use uuid::Uuid;

use crate::backend::{ExecutionBackend, LocalBackend, RemoteBackend};
use crate::http::HttpJobServiceClient;
use crate::job::{JobHandle, RetrievalJobHandle};
use crate::launcher::{JobLauncher, RetrievalJobSpec};
use crate::registry::FeatureTableRegistry;
use crate::resolver::resolve_feature_tables;
use crate::staging::{EntityStager, EntityStaging};

/// Client for submitting and tracking feature-engineering jobs
///
/// Execution mode is fixed at construction: when the configuration carries a
/// job-service URL every operation goes over RPC, otherwise jobs are handed
/// to the local launcher. The handles returned by both modes expose the same
/// contract.
pub struct Client {
    config: ClientConfig,
    registry: Arc<dyn FeatureTableRegistry>,
    stager: EntityStager,
    backend: Arc<dyn ExecutionBackend>,
}

impl Client {
    /// Creates a client, selecting the execution backend from configuration
    ///
    /// Remote mode builds the HTTP job-service client here, once; local mode
    /// requires a launcher.
    ///
    /// # Errors
    ///
    /// - `Config` if local mode is selected but no launcher was supplied, or
    ///   the job-service section is incomplete
    pub fn new(
        config: ClientConfig,
        registry: Arc<dyn FeatureTableRegistry>,
        staging: Arc<dyn EntityStaging>,
        launcher: Option<Arc<dyn JobLauncher>>,
    ) -> Result<Self> {
        let backend: Arc<dyn ExecutionBackend> = if config.remote_mode() {
            let service = HttpJobServiceClient::from_config(&config.job_service)?;
            tracing::info!(
                url = config.job_service.url.as_deref().unwrap_or_default(),
                "Using remote job service"
            );
            Arc::new(RemoteBackend::new(Arc::new(service)))
        } else {
            let launcher = launcher.ok_or_else(|| {
                Error::config(
                    "local mode requires a job launcher; set job_service.url for remote mode",
                )
            })?;
            Arc::new(LocalBackend::new(launcher))
        };

        Ok(Self::with_backend(config, registry, staging, backend))
    }

    /// Creates a client around an explicit execution backend
    ///
    /// Useful for custom transports and for tests.
    pub fn with_backend(
        config: ClientConfig,
        registry: Arc<dyn FeatureTableRegistry>,
        staging: Arc<dyn EntityStaging>,
        backend: Arc<dyn ExecutionBackend>,
    ) -> Self {
        let stager = EntityStager::new(staging, config.staging.location.clone());
        Self {
            config,
            registry,
            stager,
            backend,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Submits a historical feature retrieval job
    ///
    /// Resolves `feature_refs` against the registry, verifies that every
    /// batch source declares a created-timestamp column, stages an in-memory
    /// entity dataset, and submits. Without an explicit `output_location` a
    /// fresh unique path under the configured output base is generated, so
    /// repeated submissions never collide.
    ///
    /// The returned handle's output location becomes readable once the job
    /// completes.
    pub async fn get_historical_features<S: AsRef<str>>(
        &self,
        feature_refs: &[S],
        entity_source: EntitySource,
        output_location: Option<String>,
    ) -> Result<Box<dyn RetrievalJobHandle>> {
        let refs = FeatureRef::parse_many(feature_refs)?;
        let tables =
            resolve_feature_tables(self.registry.as_ref(), &refs, &self.config.project).await?;

        // Both checks run before any staging upload or RPC.
        ensure_created_timestamp_columns(&tables)?;
        if let EntitySource::Dataset(dataset) = &entity_source {
            ensure_event_timestamp_column(dataset)?;
        }

        let output_location = output_location.unwrap_or_else(|| {
            format!(
                "{}/{}",
                self.config.historical_output.location.trim_end_matches('/'),
                Uuid::new_v4()
            )
        });
        let output_format = self.config.historical_output.format;

        let entity_source = self.stager.maybe_stage(entity_source, &tables).await?;

        let spec = RetrievalJobSpec {
            feature_refs: refs,
            feature_tables: tables,
            entity_source,
            project: self.config.project.clone(),
            output_format,
            output_location,
        };

        let handle = self.backend.submit_retrieval(spec).await?;
        tracing::info!(
            job_id = handle.id(),
            output = handle.output_file_uri(),
            "Submitted historical retrieval job"
        );
        Ok(handle)
    }

    /// Submits a batch-to-online ingestion job over `[start, end)`
    ///
    /// The window applies to the batch source's event-timestamp column.
    /// Sources are read in place; no staging happens here.
    pub async fn start_offline_to_online_ingestion(
        &self,
        table: &FeatureTable,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Box<dyn JobHandle>> {
        let handle = self
            .backend
            .submit_batch_ingestion(&self.config.project, table, start, end)
            .await?;
        tracing::info!(
            job_id = handle.id(),
            table = %table.name,
            "Submitted batch ingestion job"
        );
        Ok(handle)
    }

    /// Submits a stream-to-online ingestion job
    ///
    /// `extra_jars` lists additional runtime dependencies for the local
    /// launcher; the remote control plane provisions its own.
    pub async fn start_stream_to_online_ingestion(
        &self,
        table: &FeatureTable,
        extra_jars: &[String],
    ) -> Result<Box<dyn JobHandle>> {
        let handle = self
            .backend
            .submit_stream_ingestion(&self.config.project, table, extra_jars)
            .await?;
        tracing::info!(
            job_id = handle.id(),
            table = %table.name,
            "Submitted stream ingestion job"
        );
        Ok(handle)
    }

    /// Enumerates jobs known to the execution backend
    pub async fn list_jobs(
        &self,
        include_terminated: bool,
        table_name: Option<&str>,
    ) -> Result<Vec<Box<dyn JobHandle>>> {
        self.backend.list_jobs(include_terminated, table_name).await
    }

    /// Looks up a job by id
    ///
    /// # Errors
    ///
    /// - `JobNotFound` carrying the id when no such job exists, in either
    ///   mode
    pub async fn get_job_by_id(&self, job_id: &str) -> Result<Box<dyn JobHandle>> {
        self.backend.get_job(job_id).await
    }
}

/// Every batch source feeding a retrieval must declare a creation timestamp
fn ensure_created_timestamp_columns(tables: &[FeatureTable]) -> Result<()> {
    for table in tables {
        if table.batch_source.created_timestamp_column().is_none() {
            return Err(Error::precondition(format!(
                "batch source of feature table '{}' must declare a created-timestamp column \
                 for historical retrieval",
                table.name
            )));
        }
    }
    Ok(())
}

/// An in-memory entity dataset must carry a timezone-naive event timestamp
fn ensure_event_timestamp_column(dataset: &EntityDataset) -> Result<()> {
    match dataset.column(EVENT_TIMESTAMP_COLUMN) {
        Some(column) if column.values.is_timestamp() => Ok(()),
        Some(_) => Err(Error::precondition(format!(
            "entity dataset column '{EVENT_TIMESTAMP_COLUMN}' must hold timezone-naive timestamps"
        ))),
        None => Err(Error::precondition(format!(
            "entity dataset must contain an '{EVENT_TIMESTAMP_COLUMN}' column"
        ))),
    }
}
