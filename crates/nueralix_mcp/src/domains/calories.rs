use health_connect_client::ActiveCaloriesBurnedRecord;

use crate::format::group_digits;
use crate::snapshot::{MetricSummary, Trend};

pub const ACTIVE_TODAY: &str = "Active today";

pub fn total_kilocalories(records: &[ActiveCaloriesBurnedRecord]) -> f64 {
    records
        .iter()
        .map(|r| r.energy.in_kilocalories)
        .filter(|kcal| kcal.is_finite())
        .sum()
}

pub fn summarize(records: &[ActiveCaloriesBurnedRecord], sep: char) -> MetricSummary {
    let rounded = total_kilocalories(records).round();
    if rounded < 1.0 {
        return MetricSummary::no_data();
    }
    MetricSummary::reading(group_digits(rounded as u64, sep), Trend::Neutral, ACTIVE_TODAY)
}
