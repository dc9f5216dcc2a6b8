//! Job handle abstraction
//!
//! A job handle is the caller-facing reference to a submitted job. Handles
//! behave identically whether the job runs through the local launcher or the
//! remote job service: same identity, same polling contract, same output
//! discovery. Only the values differ.
//!
//! The handle's lifecycle is limited to creation and polling; cancellation is
//! not part of this client.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use featurelift_core::{Error, JobKind, JobStatus, Result};

/// Uniform capability set of every submitted job
#[async_trait]
pub trait JobHandle: Send + Sync + std::fmt::Debug {
    /// Opaque job identifier, unique within the execution backend
    fn id(&self) -> &str;

    /// Which family of job this handle tracks
    fn kind(&self) -> JobKind;

    /// Polls the current lifecycle state
    ///
    /// Remote handles issue one status RPC per call; local handles ask the
    /// launcher. Errors from either backend surface unchanged.
    async fn status(&self) -> Result<JobStatus>;

    /// When the backend accepted the job
    fn start_time(&self) -> DateTime<Utc>;

    /// Location of the job's driver logs, when the backend exposes one
    fn log_uri(&self) -> Option<&str>;
}

/// Handle of a historical retrieval job, which additionally produces output
#[async_trait]
pub trait RetrievalJobHandle: JobHandle {
    /// URI the job writes its result files to
    ///
    /// The location is known at submission time; it becomes readable once
    /// the job completes.
    fn output_file_uri(&self) -> &str;
}

/// Polls a job until it reaches a terminal state
///
/// Returns the terminal status, or `Timeout` if the wait budget elapses
/// first. This is a caller-side convenience; the client itself never blocks
/// on job completion.
pub async fn wait_for_termination(
    job: &dyn JobHandle,
    poll_interval: Duration,
    timeout: Duration,
) -> Result<JobStatus> {
    let deadline = tokio::time::Instant::now() + timeout;

    loop {
        let status = job.status().await?;
        if status.is_terminal() {
            return Ok(status);
        }
        if tokio::time::Instant::now() >= deadline {
            return Err(Error::Timeout(timeout.as_secs()));
        }
        tokio::time::sleep(poll_interval).await;
    }
}
