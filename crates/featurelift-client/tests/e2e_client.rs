//! E2E tests for the job client facade
//!
//! Exercises the full dispatch path with mock collaborators:
//! - resolution and feature pruning feeding submissions
//! - precondition checks firing before staging and before any RPC
//! - the staging decision (warehouse bias, fresh file paths)
//! - local/remote mode transparency of the returned handles
//! - job enumeration and lookup in both modes

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use featurelift_client::{
    Client, EntityStaging, FeatureTableRegistry, GetHistoricalFeaturesRequest,
    GetHistoricalFeaturesResponse, GetJobRequest, GetJobResponse, IngestionJobResponse,
    JobDescriptor, JobHandle, JobLauncher, JobService, ListJobsRequest, ListJobsResponse,
    LocalBackend, RemoteBackend, RetrievalJobHandle, RetrievalJobSpec,
    StartOfflineToOnlineIngestionJobRequest, StartStreamToOnlineIngestionJobRequest,
};
use featurelift_core::{
    BatchSource, BigQuerySource, ClientConfig, ColumnValues, EntityDataset, EntitySource, Error,
    FeatureTable, FileFormat, FileSource, JobKind, JobStatus, Result, EVENT_TIMESTAMP_COLUMN,
};

// ============================================================================
// Fixtures
// ============================================================================

fn entity_dataset() -> EntityDataset {
    let ts = NaiveDate::from_ymd_opt(2021, 8, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();
    EntityDataset::new()
        .with_column("driver_id", ColumnValues::Int(vec![1001, 1002]))
        .with_column(EVENT_TIMESTAMP_COLUMN, ColumnValues::Timestamp(vec![ts, ts]))
}

fn file_table(name: &str, features: &[&str]) -> FeatureTable {
    FeatureTable::new(
        name,
        features.iter().map(|f| f.to_string()).collect(),
        BatchSource::File(
            FileSource::new(
                format!("file:///warehouse/{name}"),
                FileFormat::Parquet,
                "event_timestamp",
            )
            .with_created_timestamp_column("created_timestamp"),
        ),
    )
}

fn bigquery_table(name: &str, table_ref: &str, features: &[&str]) -> FeatureTable {
    FeatureTable::new(
        name,
        features.iter().map(|f| f.to_string()).collect(),
        BatchSource::BigQuery(
            BigQuerySource::new(table_ref, "event_timestamp")
                .with_created_timestamp_column("created_timestamp"),
        ),
    )
}

fn local_config() -> ClientConfig {
    let mut config = ClientConfig::default();
    config.project = "proj1".to_string();
    config.staging.location = "file:///stage-zone".to_string();
    config.historical_output.location = "file:///output-zone".to_string();
    config
}

fn remote_config() -> ClientConfig {
    let mut config = local_config();
    config.job_service.url = Some("http://jobs.internal:6568".to_string());
    config
}

struct MapRegistry {
    tables: HashMap<String, FeatureTable>,
}

impl MapRegistry {
    fn new(tables: Vec<FeatureTable>) -> Arc<Self> {
        Arc::new(Self {
            tables: tables.into_iter().map(|t| (t.name.clone(), t)).collect(),
        })
    }
}

#[async_trait]
impl FeatureTableRegistry for MapRegistry {
    async fn get_feature_table(&self, name: &str, _project: &str) -> Result<FeatureTable> {
        self.tables
            .get(name)
            .cloned()
            .ok_or_else(|| Error::TableNotFound(name.to_string()))
    }
}

#[derive(Default)]
struct RecordingStaging {
    file_targets: Mutex<Vec<String>>,
    bigquery_targets: Mutex<Vec<(String, String)>>,
}

impl RecordingStaging {
    fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn total_calls(&self) -> usize {
        self.file_targets.lock().unwrap().len() + self.bigquery_targets.lock().unwrap().len()
    }
}

#[async_trait]
impl EntityStaging for RecordingStaging {
    async fn stage_to_bigquery(
        &self,
        _dataset: &EntityDataset,
        project: &str,
        dataset_id: &str,
    ) -> Result<BigQuerySource> {
        self.bigquery_targets
            .lock()
            .unwrap()
            .push((project.to_string(), dataset_id.to_string()));
        Ok(BigQuerySource::new(
            format!("{project}:{dataset_id}.staged_entities"),
            EVENT_TIMESTAMP_COLUMN,
        ))
    }

    async fn stage_to_file(
        &self,
        _dataset: &EntityDataset,
        target_uri: &str,
    ) -> Result<FileSource> {
        self.file_targets.lock().unwrap().push(target_uri.to_string());
        Ok(FileSource::new(
            target_uri,
            FileFormat::Parquet,
            EVENT_TIMESTAMP_COLUMN,
        ))
    }
}

// ----------------------------------------------------------------------------
// Local launcher mock
// ----------------------------------------------------------------------------

#[derive(Debug)]
struct LocalRetrievalJob {
    id: String,
    output_file_uri: String,
    start_time: DateTime<Utc>,
}

#[async_trait]
impl JobHandle for LocalRetrievalJob {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> JobKind {
        JobKind::HistoricalRetrieval
    }

    async fn status(&self) -> Result<JobStatus> {
        Ok(JobStatus::InProgress)
    }

    fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    fn log_uri(&self) -> Option<&str> {
        Some("file:///logs/local")
    }
}

#[async_trait]
impl RetrievalJobHandle for LocalRetrievalJob {
    fn output_file_uri(&self) -> &str {
        &self.output_file_uri
    }
}

#[derive(Debug)]
struct LocalIngestionJob {
    id: String,
    kind: JobKind,
    start_time: DateTime<Utc>,
}

#[async_trait]
impl JobHandle for LocalIngestionJob {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> JobKind {
        self.kind
    }

    async fn status(&self) -> Result<JobStatus> {
        Ok(JobStatus::InProgress)
    }

    fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    fn log_uri(&self) -> Option<&str> {
        None
    }
}

#[derive(Default)]
struct RecordingLauncher {
    retrieval_specs: Mutex<Vec<RetrievalJobSpec>>,
    submissions: AtomicUsize,
}

impl RecordingLauncher {
    fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

#[async_trait]
impl JobLauncher for RecordingLauncher {
    async fn start_retrieval_job(
        &self,
        spec: RetrievalJobSpec,
    ) -> Result<Box<dyn RetrievalJobHandle>> {
        let n = self.submissions.fetch_add(1, Ordering::SeqCst);
        let output_file_uri = spec.output_location.clone();
        self.retrieval_specs.lock().unwrap().push(spec);
        Ok(Box::new(LocalRetrievalJob {
            id: format!("local-retrieval-{n}"),
            output_file_uri,
            start_time: Utc::now(),
        }))
    }

    async fn start_batch_ingestion_job(
        &self,
        _project: &str,
        table: &FeatureTable,
        _start: DateTime<Utc>,
        _end: DateTime<Utc>,
    ) -> Result<Box<dyn JobHandle>> {
        Ok(Box::new(LocalIngestionJob {
            id: format!("local-batch-{}", table.name),
            kind: JobKind::BatchIngestion,
            start_time: Utc::now(),
        }))
    }

    async fn start_stream_ingestion_job(
        &self,
        _project: &str,
        table: &FeatureTable,
        _extra_jars: &[String],
    ) -> Result<Box<dyn JobHandle>> {
        Ok(Box::new(LocalIngestionJob {
            id: format!("local-stream-{}", table.name),
            kind: JobKind::StreamIngestion,
            start_time: Utc::now(),
        }))
    }

    async fn list_jobs(
        &self,
        _include_terminated: bool,
        _table_name: Option<&str>,
    ) -> Result<Vec<Box<dyn JobHandle>>> {
        Ok(vec![Box::new(LocalIngestionJob {
            id: "local-batch-known".to_string(),
            kind: JobKind::BatchIngestion,
            start_time: Utc::now(),
        })])
    }

    async fn get_job_by_id(&self, job_id: &str) -> Result<Box<dyn JobHandle>> {
        if job_id == "local-batch-known" {
            Ok(Box::new(LocalIngestionJob {
                id: job_id.to_string(),
                kind: JobKind::BatchIngestion,
                start_time: Utc::now(),
            }))
        } else {
            Err(Error::JobNotFound(job_id.to_string()))
        }
    }
}

// ----------------------------------------------------------------------------
// Remote job service mock
// ----------------------------------------------------------------------------

#[derive(Default, Debug)]
struct RecordingJobService {
    retrieval_requests: Mutex<Vec<GetHistoricalFeaturesRequest>>,
    batch_requests: Mutex<Vec<StartOfflineToOnlineIngestionJobRequest>>,
    stream_requests: Mutex<Vec<StartStreamToOnlineIngestionJobRequest>>,
    list_requests: Mutex<Vec<ListJobsRequest>>,
    known_jobs: Mutex<HashMap<String, JobDescriptor>>,
    listed_jobs: Mutex<Vec<JobDescriptor>>,
}

impl RecordingJobService {
    fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn request_count(&self) -> usize {
        self.retrieval_requests.lock().unwrap().len()
            + self.batch_requests.lock().unwrap().len()
            + self.stream_requests.lock().unwrap().len()
    }

    fn start_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 8, 1, 12, 0, 0).unwrap()
    }
}

#[async_trait]
impl JobService for RecordingJobService {
    async fn get_historical_features(
        &self,
        request: GetHistoricalFeaturesRequest,
    ) -> Result<GetHistoricalFeaturesResponse> {
        let output_file_uri = request.output_location.clone();
        self.retrieval_requests.lock().unwrap().push(request);
        Ok(GetHistoricalFeaturesResponse {
            id: "remote-retrieval-1".to_string(),
            output_file_uri,
            job_start_time: Self::start_time(),
            log_uri: Some("http://logs/remote-retrieval-1".to_string()),
        })
    }

    async fn start_offline_to_online_ingestion_job(
        &self,
        request: StartOfflineToOnlineIngestionJobRequest,
    ) -> Result<IngestionJobResponse> {
        self.batch_requests.lock().unwrap().push(request);
        Ok(IngestionJobResponse {
            id: "remote-batch-1".to_string(),
            job_start_time: Self::start_time(),
            log_uri: None,
        })
    }

    async fn start_stream_to_online_ingestion_job(
        &self,
        request: StartStreamToOnlineIngestionJobRequest,
    ) -> Result<IngestionJobResponse> {
        self.stream_requests.lock().unwrap().push(request);
        Ok(IngestionJobResponse {
            id: "remote-stream-1".to_string(),
            job_start_time: Self::start_time(),
            log_uri: None,
        })
    }

    async fn list_jobs(&self, request: ListJobsRequest) -> Result<ListJobsResponse> {
        self.list_requests.lock().unwrap().push(request);
        Ok(ListJobsResponse {
            jobs: self.listed_jobs.lock().unwrap().clone(),
        })
    }

    async fn get_job(&self, request: GetJobRequest) -> Result<GetJobResponse> {
        self.known_jobs
            .lock()
            .unwrap()
            .get(&request.job_id)
            .cloned()
            .map(|job| GetJobResponse { job })
            .ok_or(Error::JobNotFound(request.job_id))
    }
}

fn local_client(
    registry: Arc<MapRegistry>,
    staging: Arc<RecordingStaging>,
    launcher: Arc<RecordingLauncher>,
) -> Client {
    Client::with_backend(
        local_config(),
        registry,
        staging,
        Arc::new(LocalBackend::new(launcher)),
    )
}

fn remote_client(
    registry: Arc<MapRegistry>,
    staging: Arc<RecordingStaging>,
    service: Arc<RecordingJobService>,
) -> Client {
    Client::with_backend(
        remote_config(),
        registry,
        staging,
        Arc::new(RemoteBackend::new(service)),
    )
}

// ============================================================================
// Historical retrieval
// ============================================================================

#[tokio::test]
async fn test_local_retrieval_passes_pruned_tables_to_launcher() {
    let registry = MapRegistry::new(vec![
        file_table("bookings", &["bookings_7d", "bookings_14d", "bookings_30d"]),
        file_table("driver", &["conv_rate", "acc_rate"]),
    ]);
    let staging = RecordingStaging::new();
    let launcher = RecordingLauncher::new();
    let client = local_client(registry, staging.clone(), launcher.clone());

    let job = client
        .get_historical_features(
            &["bookings:bookings_7d", "bookings:bookings_14d", "driver:conv_rate"],
            EntitySource::Dataset(entity_dataset()),
            None,
        )
        .await
        .unwrap();

    assert_eq!(job.kind(), JobKind::HistoricalRetrieval);

    let specs = launcher.retrieval_specs.lock().unwrap();
    assert_eq!(specs.len(), 1);
    let spec = &specs[0];
    assert_eq!(spec.project, "proj1");
    assert_eq!(spec.feature_tables.len(), 2);
    assert_eq!(spec.feature_tables[0].features, vec!["bookings_7d", "bookings_14d"]);
    assert_eq!(spec.feature_tables[1].features, vec!["conv_rate"]);

    // The in-memory dataset was staged to file storage before submission.
    assert!(matches!(spec.entity_source, EntitySource::File(_)));
    assert_eq!(staging.file_targets.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_retrieval_generates_unique_output_locations() {
    let registry = MapRegistry::new(vec![file_table("bookings", &["bookings_7d"])]);
    let staging = RecordingStaging::new();
    let launcher = RecordingLauncher::new();
    let client = local_client(registry, staging, launcher.clone());

    let first = client
        .get_historical_features(
            &["bookings:bookings_7d"],
            EntitySource::Dataset(entity_dataset()),
            None,
        )
        .await
        .unwrap();
    let second = client
        .get_historical_features(
            &["bookings:bookings_7d"],
            EntitySource::Dataset(entity_dataset()),
            None,
        )
        .await
        .unwrap();

    assert_ne!(first.output_file_uri(), second.output_file_uri());
    for job in [&first, &second] {
        assert!(
            job.output_file_uri().starts_with("file:///output-zone/"),
            "output: {}",
            job.output_file_uri()
        );
    }
}

#[tokio::test]
async fn test_retrieval_respects_explicit_output_location() {
    let registry = MapRegistry::new(vec![file_table("bookings", &["bookings_7d"])]);
    let client = local_client(registry, RecordingStaging::new(), RecordingLauncher::new());

    let job = client
        .get_historical_features(
            &["bookings:bookings_7d"],
            EntitySource::Dataset(entity_dataset()),
            Some("gs://custom/output".to_string()),
        )
        .await
        .unwrap();

    assert_eq!(job.output_file_uri(), "gs://custom/output");
}

#[tokio::test]
async fn test_remote_retrieval_carries_resolved_inputs() {
    let registry = MapRegistry::new(vec![file_table("bookings", &["bookings_7d", "bookings_14d"])]);
    let staging = RecordingStaging::new();
    let service = RecordingJobService::new();
    let client = remote_client(registry, staging, service.clone());

    let job = client
        .get_historical_features(
            &["bookings:bookings_7d"],
            EntitySource::Dataset(entity_dataset()),
            None,
        )
        .await
        .unwrap();

    assert_eq!(job.id(), "remote-retrieval-1");
    assert_eq!(job.log_uri(), Some("http://logs/remote-retrieval-1"));

    let requests = service.retrieval_requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.feature_refs, vec!["bookings:bookings_7d"]);
    assert_eq!(request.project, "proj1");
    assert_eq!(request.output_format, "parquet");
    assert_eq!(request.output_location, job.output_file_uri());

    // Staging ran before the RPC: the request carries the staged source.
    assert!(matches!(request.entity_source, EntitySource::File(_)));
}

#[tokio::test]
async fn test_already_staged_entity_source_is_not_restaged() {
    let registry = MapRegistry::new(vec![file_table("bookings", &["bookings_7d"])]);
    let staging = RecordingStaging::new();
    let launcher = RecordingLauncher::new();
    let client = local_client(registry, staging.clone(), launcher);

    let source = EntitySource::File(
        FileSource::new("gs://bucket/entities", FileFormat::Parquet, EVENT_TIMESTAMP_COLUMN),
    );
    client
        .get_historical_features(&["bookings:bookings_7d"], source, None)
        .await
        .unwrap();

    assert_eq!(staging.total_calls(), 0);
}

// ============================================================================
// Preconditions
// ============================================================================

#[tokio::test]
async fn test_missing_created_timestamp_fails_before_staging_and_rpc() {
    // Batch source without a created-timestamp column.
    let table = FeatureTable::new(
        "bookings",
        vec!["bookings_7d".to_string()],
        BatchSource::File(FileSource::new(
            "file:///warehouse/bookings",
            FileFormat::Parquet,
            "event_timestamp",
        )),
    );
    let registry = MapRegistry::new(vec![table]);
    let staging = RecordingStaging::new();
    let service = RecordingJobService::new();
    let client = remote_client(registry, staging.clone(), service.clone());

    let err = client
        .get_historical_features(
            &["bookings:bookings_7d"],
            EntitySource::Dataset(entity_dataset()),
            None,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Precondition(_)), "got {err:?}");
    assert_eq!(staging.total_calls(), 0);
    assert_eq!(service.request_count(), 0);
}

#[tokio::test]
async fn test_entity_dataset_without_event_timestamp_is_rejected() {
    let registry = MapRegistry::new(vec![file_table("bookings", &["bookings_7d"])]);
    let staging = RecordingStaging::new();
    let launcher = RecordingLauncher::new();
    let client = local_client(registry, staging.clone(), launcher);

    let dataset = EntityDataset::new().with_column("driver_id", ColumnValues::Int(vec![1]));
    let err = client
        .get_historical_features(&["bookings:bookings_7d"], EntitySource::Dataset(dataset), None)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Precondition(_)));
    assert_eq!(staging.total_calls(), 0);
}

#[tokio::test]
async fn test_entity_dataset_with_wrongly_typed_timestamp_is_rejected() {
    let registry = MapRegistry::new(vec![file_table("bookings", &["bookings_7d"])]);
    let client = local_client(registry, RecordingStaging::new(), RecordingLauncher::new());

    let dataset = EntityDataset::new()
        .with_column("driver_id", ColumnValues::Int(vec![1]))
        .with_column(
            EVENT_TIMESTAMP_COLUMN,
            ColumnValues::String(vec!["2021-08-01".to_string()]),
        );
    let err = client
        .get_historical_features(&["bookings:bookings_7d"], EntitySource::Dataset(dataset), None)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Precondition(_)));
}

#[tokio::test]
async fn test_malformed_feature_ref_is_rejected() {
    let registry = MapRegistry::new(vec![]);
    let client = local_client(registry, RecordingStaging::new(), RecordingLauncher::new());

    let err = client
        .get_historical_features(
            &["not-a-reference"],
            EntitySource::Dataset(entity_dataset()),
            None,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, Error::InvalidFeatureRef(_)));
}

// ============================================================================
// Staging decision
// ============================================================================

#[tokio::test]
async fn test_mixed_backends_stage_to_first_bigquery_source() {
    let registry = MapRegistry::new(vec![
        file_table("files_first", &["f1"]),
        bigquery_table("bq_first", "proj-a:ds_a.events", &["f2"]),
        bigquery_table("bq_second", "proj-b:ds_b.events", &["f3"]),
    ]);
    let staging = RecordingStaging::new();
    let service = RecordingJobService::new();
    let client = remote_client(registry, staging.clone(), service.clone());

    client
        .get_historical_features(
            &["files_first:f1", "bq_first:f2", "bq_second:f3"],
            EntitySource::Dataset(entity_dataset()),
            None,
        )
        .await
        .unwrap();

    let targets = staging.bigquery_targets.lock().unwrap();
    assert_eq!(targets.as_slice(), &[("proj-a".to_string(), "ds_a".to_string())]);
    assert!(staging.file_targets.lock().unwrap().is_empty());

    let requests = service.retrieval_requests.lock().unwrap();
    assert!(matches!(requests[0].entity_source, EntitySource::BigQuery(_)));
}

// ============================================================================
// Ingestion
// ============================================================================

#[tokio::test]
async fn test_remote_batch_ingestion_carries_time_window() {
    let staging = RecordingStaging::new();
    let service = RecordingJobService::new();
    let client = remote_client(MapRegistry::new(vec![]), staging, service.clone());

    let table = file_table("driver_stats", &["conv_rate"]);
    let start = Utc.with_ymd_and_hms(2021, 8, 1, 0, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2021, 8, 2, 0, 0, 0).unwrap();

    let job = client
        .start_offline_to_online_ingestion(&table, start, end)
        .await
        .unwrap();

    assert_eq!(job.id(), "remote-batch-1");
    assert_eq!(job.kind(), JobKind::BatchIngestion);

    let requests = service.batch_requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].project, "proj1");
    assert_eq!(requests[0].table_name, "driver_stats");
    assert_eq!(requests[0].start_date, start);
    assert_eq!(requests[0].end_date, end);
}

#[tokio::test]
async fn test_remote_stream_ingestion_has_no_time_window() {
    let service = RecordingJobService::new();
    let client = remote_client(MapRegistry::new(vec![]), RecordingStaging::new(), service.clone());

    let table = file_table("driver_stats", &["conv_rate"]);
    let job = client
        .start_stream_to_online_ingestion(&table, &["gs://jars/extra.jar".to_string()])
        .await
        .unwrap();

    assert_eq!(job.kind(), JobKind::StreamIngestion);

    let requests = service.stream_requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].table_name, "driver_stats");
}

#[tokio::test]
async fn test_local_ingestion_delegates_to_launcher() {
    let launcher = RecordingLauncher::new();
    let client = local_client(MapRegistry::new(vec![]), RecordingStaging::new(), launcher);

    let table = file_table("driver_stats", &["conv_rate"]);
    let start = Utc.with_ymd_and_hms(2021, 8, 1, 0, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2021, 8, 2, 0, 0, 0).unwrap();

    let batch = client
        .start_offline_to_online_ingestion(&table, start, end)
        .await
        .unwrap();
    assert_eq!(batch.id(), "local-batch-driver_stats");

    let stream = client
        .start_stream_to_online_ingestion(&table, &[])
        .await
        .unwrap();
    assert_eq!(stream.id(), "local-stream-driver_stats");
    assert_eq!(stream.kind(), JobKind::StreamIngestion);
}

// ============================================================================
// Enumeration and lookup
// ============================================================================

#[tokio::test]
async fn test_remote_list_jobs_maps_descriptor_kinds() {
    let service = RecordingJobService::new();
    {
        let mut listed = service.listed_jobs.lock().unwrap();
        listed.push(JobDescriptor {
            id: "r-1".to_string(),
            kind: JobKind::HistoricalRetrieval,
            status: JobStatus::Completed,
            start_time: Utc::now(),
            log_uri: None,
            table_name: None,
            output_file_uri: Some("gs://out/r-1".to_string()),
        });
        listed.push(JobDescriptor {
            id: "b-1".to_string(),
            kind: JobKind::BatchIngestion,
            status: JobStatus::InProgress,
            start_time: Utc::now(),
            log_uri: None,
            table_name: Some("driver_stats".to_string()),
            output_file_uri: None,
        });
        listed.push(JobDescriptor {
            id: "s-1".to_string(),
            kind: JobKind::StreamIngestion,
            status: JobStatus::Starting,
            start_time: Utc::now(),
            log_uri: None,
            table_name: Some("driver_stats".to_string()),
            output_file_uri: None,
        });
    }
    let client = remote_client(MapRegistry::new(vec![]), RecordingStaging::new(), service.clone());

    let jobs = client.list_jobs(true, Some("driver_stats")).await.unwrap();

    let kinds: Vec<JobKind> = jobs.iter().map(|j| j.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            JobKind::HistoricalRetrieval,
            JobKind::BatchIngestion,
            JobKind::StreamIngestion
        ]
    );

    let requests = service.list_requests.lock().unwrap();
    assert!(requests[0].include_terminated);
    assert_eq!(requests[0].table_name.as_deref(), Some("driver_stats"));
}

#[tokio::test]
async fn test_remote_get_job_unknown_id_surfaces_not_found() {
    let service = RecordingJobService::new();
    let client = remote_client(MapRegistry::new(vec![]), RecordingStaging::new(), service);

    let err = client.get_job_by_id("unknown-id").await.unwrap_err();

    match err {
        Error::JobNotFound(id) => assert_eq!(id, "unknown-id"),
        other => panic!("Expected JobNotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn test_local_get_job_unknown_id_surfaces_not_found() {
    let client = local_client(
        MapRegistry::new(vec![]),
        RecordingStaging::new(),
        RecordingLauncher::new(),
    );

    let err = client.get_job_by_id("unknown-id").await.unwrap_err();
    assert!(matches!(err, Error::JobNotFound(_)));
}

#[tokio::test]
async fn test_remote_handle_polls_status_through_service() {
    let service = RecordingJobService::new();
    service.known_jobs.lock().unwrap().insert(
        "remote-batch-1".to_string(),
        JobDescriptor {
            id: "remote-batch-1".to_string(),
            kind: JobKind::BatchIngestion,
            status: JobStatus::Completed,
            start_time: Utc::now(),
            log_uri: None,
            table_name: Some("driver_stats".to_string()),
            output_file_uri: None,
        },
    );
    let client = remote_client(MapRegistry::new(vec![]), RecordingStaging::new(), service);

    let table = file_table("driver_stats", &["conv_rate"]);
    let start = Utc.with_ymd_and_hms(2021, 8, 1, 0, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2021, 8, 2, 0, 0, 0).unwrap();
    let job = client
        .start_offline_to_online_ingestion(&table, start, end)
        .await
        .unwrap();

    assert_eq!(job.status().await.unwrap(), JobStatus::Completed);
}

// ============================================================================
// Mode selection and transparency
// ============================================================================

#[tokio::test]
async fn test_local_mode_without_launcher_is_a_config_error() {
    let result = Client::new(
        local_config(),
        MapRegistry::new(vec![]),
        RecordingStaging::new(),
        None,
    );
    assert!(matches!(result, Err(Error::Config(_))));
}

#[tokio::test]
async fn test_remote_mode_needs_no_launcher() {
    let client = Client::new(
        remote_config(),
        MapRegistry::new(vec![]),
        RecordingStaging::new(),
        None,
    );
    assert!(client.is_ok());
}

#[tokio::test]
async fn test_handles_expose_identical_contract_across_modes() {
    let registry = MapRegistry::new(vec![file_table("bookings", &["bookings_7d"])]);
    let entity = EntitySource::Dataset(entity_dataset());

    let local = local_client(
        registry.clone(),
        RecordingStaging::new(),
        RecordingLauncher::new(),
    );
    let remote = remote_client(
        registry,
        RecordingStaging::new(),
        RecordingJobService::new(),
    );

    let local_job = local
        .get_historical_features(&["bookings:bookings_7d"], entity.clone(), None)
        .await
        .unwrap();
    let remote_job = remote
        .get_historical_features(&["bookings:bookings_7d"], entity, None)
        .await
        .unwrap();

    // Same shape in both modes: non-empty identity, a kind, an output
    // location, and a pollable status. Values differ, contracts do not.
    for job in [&local_job, &remote_job] {
        assert!(!job.id().is_empty());
        assert_eq!(job.kind(), JobKind::HistoricalRetrieval);
        assert!(!job.output_file_uri().is_empty());
    }
    assert_eq!(local_job.status().await.unwrap(), JobStatus::InProgress);
    assert_ne!(local_job.id(), remote_job.id());
}
