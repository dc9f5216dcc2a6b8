//! HTTP/JSON transport for the job service
//!
//! The provided [`JobService`] implementation. Each RPC posts a JSON body to
//! a fixed route under the configured base URL. The underlying client is
//! constructed once from configuration and reused across calls; it is safe
//! for concurrent use and carries no per-call mutable state.

use std::time::Duration;

use async_trait::async_trait;
use featurelift_core::{Error, JobServiceConfig, Result};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::service::{
    GetHistoricalFeaturesRequest, GetHistoricalFeaturesResponse, GetJobRequest, GetJobResponse,
    IngestionJobResponse, JobService, ListJobsRequest, ListJobsResponse,
    StartOfflineToOnlineIngestionJobRequest, StartStreamToOnlineIngestionJobRequest,
};

const HISTORICAL_FEATURES_ROUTE: &str = "/api/v1/jobs/historical_features";
const OFFLINE_INGESTION_ROUTE: &str = "/api/v1/jobs/ingestion/offline";
const STREAM_INGESTION_ROUTE: &str = "/api/v1/jobs/ingestion/stream";
const LIST_JOBS_ROUTE: &str = "/api/v1/jobs/list";
const GET_JOB_ROUTE: &str = "/api/v1/jobs/get";

/// Job service client speaking HTTP/JSON
#[derive(Debug)]
pub struct HttpJobServiceClient {
    client: reqwest::Client,
    base_url: String,
    auth_token: Option<String>,
    timeout_seconds: u64,
}

impl HttpJobServiceClient {
    /// Builds the client from the job-service configuration section
    ///
    /// # Errors
    ///
    /// - `Config` if the URL is unset, auth is enabled without a token, or
    ///   the TLS certificate cannot be read
    pub fn from_config(config: &JobServiceConfig) -> Result<Self> {
        let base_url = config
            .url
            .clone()
            .ok_or_else(|| Error::config("job_service.url is not set"))?;

        let mut builder =
            reqwest::Client::builder().timeout(Duration::from_secs(config.connection_timeout_seconds));

        if config.tls_enabled {
            if let Some(cert_path) = &config.tls_cert_path {
                let pem = std::fs::read(cert_path).map_err(|e| {
                    Error::config(format!("Failed to read TLS certificate {cert_path}: {e}"))
                })?;
                let certificate = reqwest::Certificate::from_pem(&pem).map_err(|e| {
                    Error::config(format!("Invalid TLS certificate {cert_path}: {e}"))
                })?;
                builder = builder.add_root_certificate(certificate);
            }
        }

        let auth_token = if config.auth_enabled {
            let token = config
                .auth_token
                .clone()
                .ok_or_else(|| Error::config("auth_enabled requires job_service.auth_token"))?;
            Some(token)
        } else {
            None
        };

        let client = builder
            .build()
            .map_err(|e| Error::transport(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token,
            timeout_seconds: config.connection_timeout_seconds,
        })
    }

    async fn post_raw<Req: Serialize>(
        &self,
        route: &str,
        body: &Req,
    ) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.base_url, route);
        let mut request = self.client.post(&url).json(body);
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }

        request.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout(self.timeout_seconds)
            } else {
                Error::transport(format!("POST {url}: {e}"))
            }
        })
    }

    async fn decode<Resp: DeserializeOwned>(response: reqwest::Response) -> Result<Resp> {
        let url = response.url().clone();
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::transport(format!(
                "{url} returned {status}: {body}"
            )));
        }

        response
            .json::<Resp>()
            .await
            .map_err(|e| Error::transport(format!("Failed to decode response from {url}: {e}")))
    }
}

#[async_trait]
impl JobService for HttpJobServiceClient {
    async fn get_historical_features(
        &self,
        request: GetHistoricalFeaturesRequest,
    ) -> Result<GetHistoricalFeaturesResponse> {
        let response = self.post_raw(HISTORICAL_FEATURES_ROUTE, &request).await?;
        Self::decode(response).await
    }

    async fn start_offline_to_online_ingestion_job(
        &self,
        request: StartOfflineToOnlineIngestionJobRequest,
    ) -> Result<IngestionJobResponse> {
        let response = self.post_raw(OFFLINE_INGESTION_ROUTE, &request).await?;
        Self::decode(response).await
    }

    async fn start_stream_to_online_ingestion_job(
        &self,
        request: StartStreamToOnlineIngestionJobRequest,
    ) -> Result<IngestionJobResponse> {
        let response = self.post_raw(STREAM_INGESTION_ROUTE, &request).await?;
        Self::decode(response).await
    }

    async fn list_jobs(&self, request: ListJobsRequest) -> Result<ListJobsResponse> {
        let response = self.post_raw(LIST_JOBS_ROUTE, &request).await?;
        Self::decode(response).await
    }

    async fn get_job(&self, request: GetJobRequest) -> Result<GetJobResponse> {
        let response = self.post_raw(GET_JOB_ROUTE, &request).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::JobNotFound(request.job_id));
        }
        Self::decode(response).await
    }
}
