use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;

use crate::config::AppConfig;
use crate::core::error::AppError;
use crate::core::http_client::build_http_client;
use crate::features::localtime::dto::{TimeRequest, TimeResponse};

const LOCALTIME_PATH: &str = "api/localtime";

#[async_trait]
pub trait LocalTimeApi: Send + Sync {
    async fn submit_time(&self, request: TimeRequest) -> Result<TimeResponse, AppError>;

    async fn fetch_times(&self) -> Result<Vec<TimeResponse>, AppError>;
}

pub struct LocalTimeClient {
    endpoint: Url,
    http_client: reqwest::Client,
}

impl LocalTimeClient {
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        let base = Url::parse(&config.base_url).map_err(|err| {
            AppError::configuration(format!("invalid base url {}: {err}", config.base_url))
        })?;
        let endpoint = base.join(LOCALTIME_PATH).map_err(|err| {
            AppError::configuration(format!("invalid localtime endpoint: {err}"))
        })?;
        let http_client = build_http_client(config)
            .map_err(|err| AppError::internal(format!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            endpoint,
            http_client,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn decode_success<T>(&self, response: reqwest::Response) -> Result<T, AppError>
    where
        T: DeserializeOwned,
    {
        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read body>".to_string());
            let snippet = text.chars().take(512).collect::<String>();
            return Err(AppError::upstream(format!(
                "request to {} failed with {status}: {snippet}",
                self.endpoint
            )));
        }

        response.json::<T>().await.map_err(|err| {
            AppError::decode(format!(
                "failed to parse response from {}: {err}",
                self.endpoint
            ))
        })
    }
}

#[async_trait]
impl LocalTimeApi for LocalTimeClient {
    async fn submit_time(&self, request: TimeRequest) -> Result<TimeResponse, AppError> {
        tracing::debug!(local_time = %request.local_time, url = %self.endpoint, "submitting time");

        let response = self
            .http_client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await
            .map_err(|err| {
                AppError::upstream(format!("network error contacting {}: {err}", self.endpoint))
            })?;

        let submitted = self.decode_success::<TimeResponse>(response).await?;
        tracing::debug!(id = submitted.id, "time accepted by server");
        Ok(submitted)
    }

    async fn fetch_times(&self) -> Result<Vec<TimeResponse>, AppError> {
        tracing::debug!(url = %self.endpoint, "fetching submitted times");

        let response = self
            .http_client
            .get(self.endpoint.clone())
            .send()
            .await
            .map_err(|err| {
                AppError::upstream(format!("network error contacting {}: {err}", self.endpoint))
            })?;

        let times = self.decode_success::<Vec<TimeResponse>>(response).await?;
        tracing::debug!(count = times.len(), "times fetched");
        Ok(times)
    }
}
