use health_connect_client::HeartRateRecord;

use crate::snapshot::{MetricSummary, Trend};

pub const LATEST_READING: &str = "Latest reading";

/// Latest sample across `records`, rounded to whole beats per minute.
pub fn latest_bpm(records: &[HeartRateRecord]) -> Option<i64> {
    records
        .iter()
        .filter_map(|r| r.latest_sample())
        .max_by_key(|s| s.time)
        .map(|s| s.beats_per_minute)
        .filter(|bpm| bpm.is_finite() && *bpm >= 0.0)
        .map(|bpm| bpm.round() as i64)
}

pub fn summarize(records: &[HeartRateRecord]) -> MetricSummary {
    match latest_bpm(records) {
        Some(bpm) => MetricSummary::reading(format!("{bpm} bpm"), Trend::Neutral, LATEST_READING),
        None => MetricSummary::no_data(),
    }
}
