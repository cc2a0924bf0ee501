use health_connect_client::StepsRecord;

use crate::format::{group_digits, signed_grouped};
use crate::snapshot::{MetricSummary, MetricValue, Trend};

pub const SAME_AS_YESTERDAY: &str = "Same as yesterday";
pub const NO_YESTERDAY: &str = "No data for yesterday";

/// Sum of step counts, saturating at `u64::MAX`.
pub fn total(records: &[StepsRecord]) -> u64 {
    records
        .iter()
        .fold(0u64, |acc, r| acc.saturating_add(r.count))
}

/// `today - yesterday`, clamped to the `i64` range.
pub fn day_delta(today: u64, yesterday: u64) -> i64 {
    let wide = i128::from(today) - i128::from(yesterday);
    wide.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
}

/// `"+1,000 from yesterday"`, `"-1,203 from yesterday"` or `"Same as yesterday"`.
pub fn change_text(delta: i64, sep: char) -> String {
    if delta == 0 {
        SAME_AS_YESTERDAY.to_string()
    } else {
        format!("{} from yesterday", signed_grouped(delta, sep))
    }
}

/// Summarize today's steps. `yesterday` is `None` when that query failed.
pub fn summarize(
    today: &[StepsRecord],
    yesterday: Option<&[StepsRecord]>,
    sep: char,
) -> MetricSummary {
    let today_total = total(today);
    let Some(yesterday) = yesterday else {
        return if today_total == 0 {
            MetricSummary::no_data_with(NO_YESTERDAY)
        } else {
            MetricSummary::reading(group_digits(today_total, sep), Trend::Neutral, NO_YESTERDAY)
        };
    };

    let delta = day_delta(today_total, total(yesterday));
    let trend = Trend::of_delta(delta);
    let change = change_text(delta, sep);

    if today_total == 0 {
        MetricSummary {
            value: MetricValue::NoData,
            trend,
            change,
        }
    } else {
        MetricSummary::reading(group_digits(today_total, sep), trend, change)
    }
}
