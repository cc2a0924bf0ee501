//! Record shapes returned by the provider, using Health Connect field names.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::RecordType;

/// Query window. Both bounds are inclusive.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "operator", rename_all = "camelCase")]
pub enum TimeRangeFilter {
    #[serde(rename_all = "camelCase")]
    Between {
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    },
}

impl TimeRangeFilter {
    pub fn between(start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Self {
        Self::Between {
            start_time,
            end_time,
        }
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        match self {
            Self::Between { start_time, .. } => *start_time,
        }
    }

    pub fn end_time(&self) -> DateTime<Utc> {
        match self {
            Self::Between { end_time, .. } => *end_time,
        }
    }

    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        t >= self.start_time() && t <= self.end_time()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReadRecordsOptions {
    pub time_range_filter: TimeRangeFilter,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ascending_order: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

impl ReadRecordsOptions {
    pub fn new(time_range_filter: TimeRangeFilter) -> Self {
        Self {
            time_range_filter,
            ascending_order: None,
            page_size: None,
        }
    }

    /// Newest record first, at most one.
    pub fn latest(time_range_filter: TimeRangeFilter) -> Self {
        Self {
            time_range_filter,
            ascending_order: Some(false),
            page_size: Some(1),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StepsRecord {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub count: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HeartRateSample {
    pub time: DateTime<Utc>,
    pub beats_per_minute: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HeartRateRecord {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub samples: Vec<HeartRateSample>,
}

impl HeartRateRecord {
    pub fn latest_sample(&self) -> Option<&HeartRateSample> {
        self.samples.iter().max_by_key(|s| s.time)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SleepSessionRecord {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl SleepSessionRecord {
    pub fn duration(&self) -> TimeDelta {
        self.end_time - self.start_time
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Energy {
    pub in_kilocalories: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActiveCaloriesBurnedRecord {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub energy: Energy,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "recordType")]
pub enum HealthRecord {
    Steps(StepsRecord),
    HeartRate(HeartRateRecord),
    SleepSession(SleepSessionRecord),
    ActiveCaloriesBurned(ActiveCaloriesBurnedRecord),
}

impl HealthRecord {
    pub fn record_type(&self) -> RecordType {
        match self {
            HealthRecord::Steps(_) => RecordType::Steps,
            HealthRecord::HeartRate(_) => RecordType::HeartRate,
            HealthRecord::SleepSession(_) => RecordType::SleepSession,
            HealthRecord::ActiveCaloriesBurned(_) => RecordType::ActiveCaloriesBurned,
        }
    }
}

/// Links a concrete record struct to its [`RecordType`].
pub trait RecordKind: Sized + Send {
    const RECORD_TYPE: RecordType;

    fn from_record(record: HealthRecord) -> Option<Self>;

    fn into_record(self) -> HealthRecord;
}

macro_rules! record_kind {
    ($ty:ty, $variant:ident) => {
        impl RecordKind for $ty {
            const RECORD_TYPE: RecordType = RecordType::$variant;

            fn from_record(record: HealthRecord) -> Option<Self> {
                match record {
                    HealthRecord::$variant(r) => Some(r),
                    _ => None,
                }
            }

            fn into_record(self) -> HealthRecord {
                HealthRecord::$variant(self)
            }
        }
    };
}

record_kind!(StepsRecord, Steps);
record_kind!(HeartRateRecord, HeartRate);
record_kind!(SleepSessionRecord, SleepSession);
record_kind!(ActiveCaloriesBurnedRecord, ActiveCaloriesBurned);
