//! `HealthDataProvider` trait over an on-device health data store, plus a
//! reqwest-based bridge client.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod config;
pub mod http_client;
pub mod observability;
pub mod records;
pub mod utils;

pub use records::{
    ActiveCaloriesBurnedRecord, Energy, HealthRecord, HeartRateRecord, HeartRateSample,
    ReadRecordsOptions, RecordKind, SleepSessionRecord, StepsRecord, TimeRangeFilter,
};

#[derive(Debug, Error)]
pub enum HealthDataError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("provider unavailable: {0}")]
    Unavailable(String),
    #[error("provider returned status {status}: {body}")]
    Api { status: u16, body: String },
}

impl HealthDataError {
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        Self::Api {
            status,
            body: body.into(),
        }
    }
}

/// Record types the insights screen reads.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
pub enum RecordType {
    Steps,
    HeartRate,
    SleepSession,
    ActiveCaloriesBurned,
}

impl RecordType {
    pub const fn as_str(self) -> &'static str {
        match self {
            RecordType::Steps => "Steps",
            RecordType::HeartRate => "HeartRate",
            RecordType::SleepSession => "SleepSession",
            RecordType::ActiveCaloriesBurned => "ActiveCaloriesBurned",
        }
    }
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum AccessType {
    Read,
    Write,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    pub access_type: AccessType,
    pub record_type: RecordType,
}

impl Permission {
    pub const fn read(record_type: RecordType) -> Self {
        Self {
            access_type: AccessType::Read,
            record_type,
        }
    }
}

/// Read access needed to build a daily snapshot.
pub const INSIGHTS_PERMISSIONS: [Permission; 4] = [
    Permission::read(RecordType::Steps),
    Permission::read(RecordType::HeartRate),
    Permission::read(RecordType::SleepSession),
    Permission::read(RecordType::ActiveCaloriesBurned),
];

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SdkStatus {
    Available,
    Unavailable,
    UpdateRequired,
    #[serde(other)]
    Unknown,
}

#[async_trait]
pub trait HealthDataProvider: Send + Sync + 'static {
    /// Whether the provider is installed and usable on this device.
    async fn sdk_status(&self) -> Result<SdkStatus, HealthDataError>;

    async fn granted_permissions(&self) -> Result<Vec<Permission>, HealthDataError>;

    /// Ask the user for `permissions`. Returns the full set granted afterwards.
    async fn request_permissions(
        &self,
        permissions: &[Permission],
    ) -> Result<Vec<Permission>, HealthDataError>;

    /// Read records of one type inside `options.time_range_filter`.
    ///
    /// Implementations must honour `ascending_order` and `page_size` when set;
    /// callers rely on `ascending_order = Some(false), page_size = Some(1)` to
    /// fetch only the most recent record.
    async fn read_records(
        &self,
        record_type: RecordType,
        options: ReadRecordsOptions,
    ) -> Result<Vec<HealthRecord>, HealthDataError>;
}

/// Read records and keep only those of kind `R`.
pub async fn read_typed<R: RecordKind>(
    provider: &dyn HealthDataProvider,
    options: ReadRecordsOptions,
) -> Result<Vec<R>, HealthDataError> {
    let records = provider.read_records(R::RECORD_TYPE, options).await?;
    Ok(records.into_iter().filter_map(R::from_record).collect())
}
