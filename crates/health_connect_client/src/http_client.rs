//! HTTP client for a device-side Health Connect bridge.
//!
//! This module provides a reqwest-based implementation of the
//! [`HealthDataProvider`](crate::HealthDataProvider) trait.

use crate::config::Config;
use crate::observability::{Outcome, record_request};
use crate::{
    ActiveCaloriesBurnedRecord, HealthDataError, HealthDataProvider, HealthRecord, HeartRateRecord,
    Permission, ReadRecordsOptions, RecordType, SdkStatus, SleepSessionRecord, StepsRecord,
};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Client for the Health Connect bridge API using reqwest.
#[derive(Clone, Debug)]
pub struct ReqwestHealthClient {
    base_url: String,
    token: SecretString,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct StatusBody {
    status: SdkStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReadRecordsRequest<'a> {
    record_type: RecordType,
    #[serde(flatten)]
    options: &'a ReadRecordsOptions,
}

#[derive(Debug, Deserialize)]
struct RecordsPage<R> {
    #[serde(default = "Vec::new")]
    records: Vec<R>,
}

impl ReqwestHealthClient {
    /// Create a new client instance.
    ///
    /// # Arguments
    /// * `base_url` - The bridge root (e.g., "http://127.0.0.1:8765")
    /// * `token` - Bearer token issued by the bridge
    pub fn new(base_url: &str, token: SecretString) -> Self {
        Self::with_timeout(base_url, token, None)
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::with_timeout(&cfg.base_url, cfg.bridge_token.clone(), Some(cfg.timeout))
    }

    fn with_timeout(base_url: &str, token: SecretString, timeout: Option<Duration>) -> Self {
        let mut builder = reqwest::Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let client = builder
            .build()
            .expect("reqwest client build should not fail");
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            client,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{}", self.base_url, path)
    }

    fn get_request(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .get(self.url(path))
            .bearer_auth(self.token.expose_secret())
    }

    fn post_request(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .post(self.url(path))
            .bearer_auth(self.token.expose_secret())
    }

    /// Execute a request and expect a JSON response.
    async fn execute_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, HealthDataError> {
        let resp = request.send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(self.error_from_response(resp).await);
        }
        Ok(resp.json::<T>().await?)
    }

    /// Extract error information from a failed response.
    async fn error_from_response(&self, resp: reqwest::Response) -> HealthDataError {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        let body_snippet: String = body.chars().take(256).collect();

        match status {
            404 => HealthDataError::NotFound(body_snippet),
            401 | 403 => HealthDataError::Auth(body_snippet),
            400 | 422 => HealthDataError::InvalidInput(body_snippet),
            503 => HealthDataError::Unavailable(body_snippet),
            _ => HealthDataError::from_status(status, body_snippet),
        }
    }

    async fn read_page<R: DeserializeOwned>(
        &self,
        record_type: RecordType,
        options: &ReadRecordsOptions,
    ) -> Result<Vec<R>, HealthDataError> {
        let body = ReadRecordsRequest {
            record_type,
            options,
        };
        let page: RecordsPage<R> = self
            .execute_json(self.post_request("records/read").json(&body))
            .await?;
        Ok(page.records)
    }

    async fn timed<T, F>(&self, operation: &'static str, fut: F) -> Result<T, HealthDataError>
    where
        F: std::future::Future<Output = Result<T, HealthDataError>>,
    {
        let started = Instant::now();
        let result = fut.await;
        let elapsed = started.elapsed();
        record_request(operation, Outcome::of(&result), elapsed);
        match &result {
            Ok(_) => tracing::debug!(operation, ?elapsed, "bridge request ok"),
            Err(e) => tracing::debug!(operation, ?elapsed, error = %e, "bridge request failed"),
        }
        result
    }
}

#[async_trait]
impl HealthDataProvider for ReqwestHealthClient {
    async fn sdk_status(&self) -> Result<SdkStatus, HealthDataError> {
        self.timed("sdk_status", async {
            let body: StatusBody = self.execute_json(self.get_request("sdk-status")).await?;
            Ok(body.status)
        })
        .await
    }

    async fn granted_permissions(&self) -> Result<Vec<Permission>, HealthDataError> {
        self.timed(
            "granted_permissions",
            self.execute_json(self.get_request("permissions")),
        )
        .await
    }

    async fn request_permissions(
        &self,
        permissions: &[Permission],
    ) -> Result<Vec<Permission>, HealthDataError> {
        if permissions.is_empty() {
            return Err(HealthDataError::InvalidInput(
                "at least one permission must be requested".into(),
            ));
        }
        self.timed(
            "request_permissions",
            self.execute_json(self.post_request("permissions").json(permissions)),
        )
        .await
    }

    async fn read_records(
        &self,
        record_type: RecordType,
        options: ReadRecordsOptions,
    ) -> Result<Vec<HealthRecord>, HealthDataError> {
        if options.page_size == Some(0) {
            return Err(HealthDataError::InvalidInput(
                "page_size must be at least 1".into(),
            ));
        }
        let opts = &options;
        self.timed("read_records", async move {
            let records = match record_type {
                RecordType::Steps => self
                    .read_page::<StepsRecord>(record_type, opts)
                    .await?
                    .into_iter()
                    .map(HealthRecord::Steps)
                    .collect(),
                RecordType::HeartRate => self
                    .read_page::<HeartRateRecord>(record_type, opts)
                    .await?
                    .into_iter()
                    .map(HealthRecord::HeartRate)
                    .collect(),
                RecordType::SleepSession => self
                    .read_page::<SleepSessionRecord>(record_type, opts)
                    .await?
                    .into_iter()
                    .map(HealthRecord::SleepSession)
                    .collect(),
                RecordType::ActiveCaloriesBurned => self
                    .read_page::<ActiveCaloriesBurnedRecord>(record_type, opts)
                    .await?
                    .into_iter()
                    .map(HealthRecord::ActiveCaloriesBurned)
                    .collect(),
            };
            Ok(records)
        })
        .await
    }
}
