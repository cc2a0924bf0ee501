//! Builds a [`DailyHealthSnapshot`] from provider reads.
//!
//! Fetching and deriving are split: [`HealthMetricsAggregator::collect`]
//! issues the five independent reads concurrently and keeps each outcome,
//! and [`HealthMetricsAggregator::aggregate`] is a pure function of those
//! outcomes. A failed read only degrades its own metric.

use health_connect_client::utils::DayWindows;
use health_connect_client::{
    ActiveCaloriesBurnedRecord, HealthDataError, HealthDataProvider, HeartRateRecord,
    ReadRecordsOptions, SleepSessionRecord, StepsRecord, read_typed,
};

use crate::domains::{calories, heart_rate, sleep, steps};
use crate::format::DEFAULT_GROUPING_SEPARATOR;
use crate::snapshot::{DailyHealthSnapshot, MetricKind, MetricSummary};

pub type QueryResult<T> = Result<Vec<T>, HealthDataError>;

/// Raw outcome of every read behind one snapshot.
#[derive(Debug)]
pub struct DailyRecords {
    pub steps_today: QueryResult<StepsRecord>,
    pub steps_yesterday: QueryResult<StepsRecord>,
    pub heart_rate: QueryResult<HeartRateRecord>,
    pub sleep: QueryResult<SleepSessionRecord>,
    pub calories: QueryResult<ActiveCaloriesBurnedRecord>,
}

impl DailyRecords {
    /// Failed reads, keyed by the metric they feed.
    pub fn failures(&self) -> Vec<(MetricKind, &HealthDataError)> {
        let mut out = Vec::new();
        if let Err(e) = &self.heart_rate {
            out.push((MetricKind::HeartRate, e));
        }
        if let Err(e) = &self.steps_today {
            out.push((MetricKind::Steps, e));
        }
        if let Err(e) = &self.steps_yesterday {
            out.push((MetricKind::Steps, e));
        }
        if let Err(e) = &self.sleep {
            out.push((MetricKind::Sleep, e));
        }
        if let Err(e) = &self.calories {
            out.push((MetricKind::Calories, e));
        }
        out
    }

    pub fn failed_metrics(&self) -> Vec<MetricKind> {
        let mut kinds: Vec<MetricKind> = self.failures().into_iter().map(|(k, _)| k).collect();
        kinds.dedup();
        kinds
    }
}

/// Snapshot plus the metrics that fell back to placeholders because a read failed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SnapshotReport {
    pub snapshot: DailyHealthSnapshot,
    pub degraded: Vec<MetricKind>,
}

#[derive(Clone, Debug)]
pub struct HealthMetricsAggregator {
    grouping_separator: char,
}

impl Default for HealthMetricsAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_GROUPING_SEPARATOR)
    }
}

impl HealthMetricsAggregator {
    pub fn new(grouping_separator: char) -> Self {
        Self { grouping_separator }
    }

    pub fn aggregate(&self, records: &DailyRecords) -> DailyHealthSnapshot {
        let sep = self.grouping_separator;
        DailyHealthSnapshot {
            steps: match &records.steps_today {
                Ok(today) => steps::summarize(today, records.steps_yesterday.as_deref().ok(), sep),
                Err(_) => MetricSummary::no_data(),
            },
            heart_rate: records
                .heart_rate
                .as_deref()
                .map(heart_rate::summarize)
                .unwrap_or_else(|_| MetricSummary::no_data()),
            sleep: records
                .sleep
                .as_deref()
                .map(sleep::summarize)
                .unwrap_or_else(|_| MetricSummary::no_data()),
            calories: records
                .calories
                .as_deref()
                .map(|r| calories::summarize(r, sep))
                .unwrap_or_else(|_| MetricSummary::no_data()),
        }
    }

    /// Issue every read for one local day.
    pub async fn collect(provider: &dyn HealthDataProvider, windows: DayWindows) -> DailyRecords {
        let DayWindows { today, yesterday } = windows;

        let (steps_today, steps_yesterday, heart_rate, sleep, calories) = tokio::join!(
            read_typed::<StepsRecord>(provider, ReadRecordsOptions::new(today.clone())),
            read_typed::<StepsRecord>(provider, ReadRecordsOptions::new(yesterday)),
            read_typed::<HeartRateRecord>(provider, ReadRecordsOptions::latest(today.clone())),
            read_typed::<SleepSessionRecord>(provider, ReadRecordsOptions::latest(today.clone())),
            read_typed::<ActiveCaloriesBurnedRecord>(provider, ReadRecordsOptions::new(today)),
        );

        DailyRecords {
            steps_today,
            steps_yesterday,
            heart_rate,
            sleep,
            calories,
        }
    }

    pub async fn fetch(
        &self,
        provider: &dyn HealthDataProvider,
        windows: DayWindows,
    ) -> SnapshotReport {
        let records = Self::collect(provider, windows).await;
        for (metric, error) in records.failures() {
            tracing::warn!(?metric, error = %error, "health read failed; showing placeholder");
        }
        SnapshotReport {
            snapshot: self.aggregate(&records),
            degraded: records.failed_metrics(),
        }
    }
}
