//! Shared test fixtures and an in-memory `HealthDataProvider`.
#![cfg(test)]

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use std::sync::Arc;
use tokio::sync::{Mutex, Notify};

use health_connect_client::{
    ActiveCaloriesBurnedRecord, Energy, HealthDataError, HealthDataProvider, HealthRecord,
    HeartRateRecord, HeartRateSample, INSIGHTS_PERMISSIONS, Permission, ReadRecordsOptions,
    RecordKind, RecordType, SdkStatus, SleepSessionRecord, StepsRecord,
};

use crate::aggregator::DailyRecords;

fn at(day: u32, h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, day, h, m, 0).unwrap()
}

fn feb(day: u32, h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 2, day, h, m, 0).unwrap()
}

/// 2025-03-01 18:00 UTC. The sample day is built around it.
pub fn fixed_now() -> DateTime<FixedOffset> {
    at(1, 18, 0).fixed_offset()
}

pub fn steps_today() -> Vec<StepsRecord> {
    vec![
        StepsRecord {
            start_time: at(1, 8, 0),
            end_time: at(1, 9, 0),
            count: 3000,
        },
        StepsRecord {
            start_time: at(1, 12, 0),
            end_time: at(1, 13, 0),
            count: 2000,
        },
    ]
}

pub fn steps_yesterday() -> Vec<StepsRecord> {
    vec![StepsRecord {
        start_time: feb(28, 10, 0),
        end_time: feb(28, 11, 0),
        count: 4000,
    }]
}

pub fn heart_rate() -> Vec<HeartRateRecord> {
    vec![HeartRateRecord {
        start_time: at(1, 9, 0),
        end_time: at(1, 9, 30),
        samples: vec![
            HeartRateSample {
                time: at(1, 9, 0),
                beats_per_minute: 64.0,
            },
            HeartRateSample {
                time: at(1, 9, 30),
                beats_per_minute: 71.6,
            },
        ],
    }]
}

pub fn sleep() -> Vec<SleepSessionRecord> {
    vec![SleepSessionRecord {
        start_time: feb(28, 22, 0),
        end_time: at(1, 5, 23),
        title: None,
    }]
}

pub fn calories() -> Vec<ActiveCaloriesBurnedRecord> {
    vec![
        ActiveCaloriesBurnedRecord {
            start_time: at(1, 8, 0),
            end_time: at(1, 9, 0),
            energy: Energy {
                in_kilocalories: 1200.3,
            },
        },
        ActiveCaloriesBurnedRecord {
            start_time: at(1, 12, 0),
            end_time: at(1, 13, 0),
            energy: Energy {
                in_kilocalories: 649.4,
            },
        },
    ]
}

/// Every read succeeded: 5,000 steps (+1,000), 72 bpm, 7h 23m, 1,850 kcal.
pub fn sample_day() -> DailyRecords {
    DailyRecords {
        steps_today: Ok(steps_today()),
        steps_yesterday: Ok(steps_yesterday()),
        heart_rate: Ok(heart_rate()),
        sleep: Ok(sleep()),
        calories: Ok(calories()),
    }
}

fn end_time(record: &HealthRecord) -> DateTime<Utc> {
    match record {
        HealthRecord::Steps(r) => r.end_time,
        HealthRecord::HeartRate(r) => r.end_time,
        HealthRecord::SleepSession(r) => r.end_time,
        HealthRecord::ActiveCaloriesBurned(r) => r.end_time,
    }
}

/// In-memory provider. Records are filtered by end time against the
/// requested window, then ordered and paged like the real store.
pub struct MockProvider {
    status: SdkStatus,
    granted: Mutex<Vec<Permission>>,
    grant_on_request: bool,
    failing: Vec<RecordType>,
    records: Vec<HealthRecord>,
    reads: Mutex<Vec<(RecordType, ReadRecordsOptions)>>,
    held: Mutex<Option<(RecordType, Arc<Notify>)>>,
}

impl MockProvider {
    pub fn with_sample_day() -> Self {
        let mut records: Vec<HealthRecord> = Vec::new();
        records.extend(steps_today().into_iter().map(RecordKind::into_record));
        records.extend(steps_yesterday().into_iter().map(RecordKind::into_record));
        records.extend(heart_rate().into_iter().map(RecordKind::into_record));
        records.extend(sleep().into_iter().map(RecordKind::into_record));
        records.extend(calories().into_iter().map(RecordKind::into_record));
        Self {
            status: SdkStatus::Available,
            granted: Mutex::new(INSIGHTS_PERMISSIONS.to_vec()),
            grant_on_request: false,
            failing: Vec::new(),
            records,
            reads: Mutex::new(Vec::new()),
            held: Mutex::new(None),
        }
    }

    pub fn with_status(mut self, status: SdkStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_granted(mut self, granted: Vec<Permission>) -> Self {
        self.granted = Mutex::new(granted);
        self
    }

    /// Reads of `record_type` fail with `Unavailable`.
    pub fn failing(mut self, record_type: RecordType) -> Self {
        self.failing.push(record_type);
        self
    }

    /// `request_permissions` grants whatever is asked.
    pub fn granting_on_request(mut self) -> Self {
        self.grant_on_request = true;
        self
    }

    /// The first read of `record_type` waits for `release`, then fails.
    pub fn holding_first_read(mut self, record_type: RecordType, release: Arc<Notify>) -> Self {
        self.held = Mutex::new(Some((record_type, release)));
        self
    }

    pub async fn reads(&self) -> Vec<(RecordType, ReadRecordsOptions)> {
        self.reads.lock().await.clone()
    }
}

#[async_trait]
impl HealthDataProvider for MockProvider {
    async fn sdk_status(&self) -> Result<SdkStatus, HealthDataError> {
        Ok(self.status)
    }

    async fn granted_permissions(&self) -> Result<Vec<Permission>, HealthDataError> {
        Ok(self.granted.lock().await.clone())
    }

    async fn request_permissions(
        &self,
        permissions: &[Permission],
    ) -> Result<Vec<Permission>, HealthDataError> {
        let mut granted = self.granted.lock().await;
        if self.grant_on_request {
            for p in permissions {
                if !granted.contains(p) {
                    granted.push(*p);
                }
            }
        }
        Ok(granted.clone())
    }

    async fn read_records(
        &self,
        record_type: RecordType,
        options: ReadRecordsOptions,
    ) -> Result<Vec<HealthRecord>, HealthDataError> {
        self.reads.lock().await.push((record_type, options.clone()));
        let held = self
            .held
            .lock()
            .await
            .take_if(|(held_type, _)| *held_type == record_type);
        if let Some((_, release)) = held {
            release.notified().await;
            return Err(HealthDataError::Unavailable(format!(
                "{record_type} read timed out"
            )));
        }
        if self.failing.contains(&record_type) {
            return Err(HealthDataError::Unavailable(format!(
                "{record_type} read failed"
            )));
        }

        let mut out: Vec<HealthRecord> = self
            .records
            .iter()
            .filter(|r| r.record_type() == record_type)
            .filter(|r| options.time_range_filter.contains(end_time(r)))
            .cloned()
            .collect();
        out.sort_by_key(end_time);
        if options.ascending_order == Some(false) {
            out.reverse();
        }
        if let Some(n) = options.page_size {
            out.truncate(n as usize);
        }
        Ok(out)
    }
}
