use health_connect_client::SleepSessionRecord;

use crate::format::hours_minutes;
use crate::snapshot::{MetricSummary, Trend};

pub const LAST_SESSION: &str = "Last session";

/// Whole minutes of the most recent session. Partial minutes are dropped.
pub fn latest_session_minutes(sessions: &[SleepSessionRecord]) -> Option<i64> {
    sessions
        .iter()
        .max_by_key(|s| s.end_time)
        .map(|s| s.duration().num_minutes())
        .filter(|m| *m >= 0)
}

pub fn summarize(sessions: &[SleepSessionRecord]) -> MetricSummary {
    match latest_session_minutes(sessions) {
        Some(minutes) => MetricSummary::reading(hours_minutes(minutes), Trend::Neutral, LAST_SESSION),
        None => MetricSummary::no_data(),
    }
}
