//! # FeatureLift Client
//!
//! Dual-mode job submission client for a feature store. The [`Client`]
//! facade submits and tracks three families of jobs (historical feature
//! retrieval, batch-to-online ingestion, stream-to-online ingestion) and
//! executes them either in-process through a [`JobLauncher`] or against
//! a remote control plane through a [`JobService`] transport. The mode is
//! chosen once, from configuration, at construction.
//!
//! External collaborators (metadata registry, launcher, job service,
//! staging utilities) are consumed through traits only; this crate contains
//! no storage or execution engine of its own.
//!
//! ## Example
//!
//! ```rust,ignore
//! use featurelift_client::Client;
//! use featurelift_core::{load_config, EntitySource};
//!
//! let config = load_config(None)?;
//! let client = Client::new(config, registry, staging, None)?;
//! let job = client
//!     .get_historical_features(&["bookings:bookings_7d"], entity_source, None)
//!     .await?;
//! println!("output at {}", job.output_file_uri());
//! ```

pub use backend::{ExecutionBackend, LocalBackend, RemoteBackend};
pub use client::Client;
pub use http::HttpJobServiceClient;
pub use job::{wait_for_termination, JobHandle, RetrievalJobHandle};
pub use launcher::{JobLauncher, RetrievalJobSpec};
pub use registry::FeatureTableRegistry;
pub use remote::{
    remote_job_from_descriptor, RemoteBatchIngestionJob, RemoteRetrievalJob,
    RemoteStreamIngestionJob,
};
pub use resolver::resolve_feature_tables;
pub use service::{
    GetHistoricalFeaturesRequest, GetHistoricalFeaturesResponse, GetJobRequest, GetJobResponse,
    IngestionJobResponse, JobDescriptor, JobService, ListJobsRequest, ListJobsResponse,
    StartOfflineToOnlineIngestionJobRequest, StartStreamToOnlineIngestionJobRequest,
};
pub use staging::{EntityStager, EntityStaging};

mod backend;
mod client;
mod http;
mod job;
mod launcher;
mod registry;
mod remote;
mod resolver;
mod service;
mod staging;
