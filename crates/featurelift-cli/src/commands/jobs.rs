//! Job inspection commands
//!
//! These commands talk straight to the control-plane job service; they
//! require remote mode to be configured.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use comfy_table::Cell;
use featurelift_client::{
    remote_job_from_descriptor, wait_for_termination, GetJobRequest, HttpJobServiceClient,
    JobDescriptor, JobService, ListJobsRequest,
};
use featurelift_core::{ClientConfig, JobStatus};
use serde::Serialize;

use crate::output::{
    create_table, format_duration, format_status, print_error, print_info, print_output,
    print_success, OutputFormat,
};

#[derive(Debug, Serialize)]
struct JobInfo {
    id: String,
    kind: String,
    status: String,
    table: Option<String>,
    started_at: String,
    log_uri: Option<String>,
    output_file_uri: Option<String>,
}

impl JobInfo {
    fn from_descriptor(descriptor: &JobDescriptor) -> Self {
        Self {
            id: descriptor.id.clone(),
            kind: descriptor.kind.to_string(),
            status: descriptor.status.to_string(),
            table: descriptor.table_name.clone(),
            started_at: descriptor.start_time.to_rfc3339(),
            log_uri: descriptor.log_uri.clone(),
            output_file_uri: descriptor.output_file_uri.clone(),
        }
    }
}

fn connect(config: &ClientConfig) -> Result<Arc<HttpJobServiceClient>> {
    if !config.remote_mode() {
        bail!(
            "No job service configured; set job_service.url in the config file \
             or pass --job-service-url"
        );
    }
    let client = HttpJobServiceClient::from_config(&config.job_service)
        .context("Failed to construct job service client")?;
    Ok(Arc::new(client))
}

/// List jobs known to the job service
pub async fn list(
    config: &ClientConfig,
    include_terminated: bool,
    table: Option<&str>,
    output_format: &str,
) -> Result<()> {
    let service = connect(config)?;

    let response = service
        .list_jobs(ListJobsRequest {
            include_terminated,
            table_name: table.map(String::from),
        })
        .await?;

    if response.jobs.is_empty() {
        print_info("No jobs found");
        return Ok(());
    }

    let infos: Vec<JobInfo> = response.jobs.iter().map(JobInfo::from_descriptor).collect();

    match OutputFormat::parse(output_format) {
        OutputFormat::Table => {
            let mut table = create_table();
            table.set_header(vec!["ID", "Kind", "Status", "Table", "Started"]);

            for info in &infos {
                table.add_row(vec![
                    Cell::new(&info.id),
                    Cell::new(&info.kind),
                    format_status(&info.status),
                    Cell::new(info.table.as_deref().unwrap_or("-")),
                    Cell::new(
                        // Show just date/time, not full RFC3339
                        info.started_at
                            .split('T')
                            .collect::<Vec<_>>()
                            .join(" ")
                            .trim_end_matches('Z')
                            .to_string(),
                    ),
                ]);
            }

            println!("{table}");
            println!("\nTotal: {} job(s)", infos.len());
        }
        _ => {
            print_output(&infos, output_format)?;
        }
    }

    Ok(())
}

/// Show one job by id
pub async fn get(config: &ClientConfig, job_id: &str, output_format: &str) -> Result<()> {
    let service = connect(config)?;

    let response = service
        .get_job(GetJobRequest {
            job_id: job_id.to_string(),
        })
        .await?;
    let info = JobInfo::from_descriptor(&response.job);

    match OutputFormat::parse(output_format) {
        OutputFormat::Table => {
            let mut table = create_table();
            table.set_header(vec!["Field", "Value"]);
            table.add_row(vec![Cell::new("ID"), Cell::new(&info.id)]);
            table.add_row(vec![Cell::new("Kind"), Cell::new(&info.kind)]);
            table.add_row(vec![Cell::new("Status"), format_status(&info.status)]);
            table.add_row(vec![
                Cell::new("Table"),
                Cell::new(info.table.as_deref().unwrap_or("-")),
            ]);
            table.add_row(vec![Cell::new("Started"), Cell::new(&info.started_at)]);
            table.add_row(vec![
                Cell::new("Log URI"),
                Cell::new(info.log_uri.as_deref().unwrap_or("-")),
            ]);
            if let Some(output) = &info.output_file_uri {
                table.add_row(vec![Cell::new("Output"), Cell::new(output)]);
            }
            println!("{table}");
        }
        _ => {
            print_output(&info, output_format)?;
        }
    }

    Ok(())
}

/// Poll a job until it reaches a terminal state
pub async fn wait(
    config: &ClientConfig,
    job_id: &str,
    poll_seconds: u64,
    timeout_seconds: u64,
) -> Result<()> {
    let service = connect(config)?;

    let response = service
        .get_job(GetJobRequest {
            job_id: job_id.to_string(),
        })
        .await?;

    let service: Arc<dyn JobService> = service;
    let job = remote_job_from_descriptor(service, response.job);

    print_info(&format!(
        "Waiting for job {job_id} (polling every {})",
        format_duration(poll_seconds as i64)
    ));

    let status = wait_for_termination(
        job.as_ref(),
        Duration::from_secs(poll_seconds),
        Duration::from_secs(timeout_seconds),
    )
    .await?;

    match status {
        JobStatus::Completed => {
            print_success(&format!("Job {job_id} completed"));
            Ok(())
        }
        JobStatus::Failed => {
            print_error(&format!("Job {job_id} failed"));
            bail!("job {job_id} failed");
        }
        // wait_for_termination only returns terminal states
        other => bail!("job {job_id} ended in unexpected state {other}"),
    }
}
