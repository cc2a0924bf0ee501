//! Day-window helpers for building read queries.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};

use crate::TimeRangeFilter;

/// First instant of `date` in `tz`, as a UTC instant.
///
/// Midnight can fall inside a forward DST gap; the day then starts where the
/// gap ends. An ambiguous midnight resolves to the earlier instant.
pub fn start_of_day<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);
    (0..=24 * 4)
        .filter_map(|quarter| midnight.checked_add_signed(TimeDelta::minutes(15 * quarter)))
        .find_map(|local| tz.from_local_datetime(&local).earliest())
        .map(|start| start.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&midnight))
}

/// Local midnight up to `now`.
pub fn today_so_far<Tz: TimeZone>(now: &DateTime<Tz>) -> TimeRangeFilter {
    let start = start_of_day(now.date_naive(), &now.timezone());
    TimeRangeFilter::between(start, now.with_timezone(&Utc))
}

/// The whole previous local day: yesterday's midnight to today's midnight.
/// Both ends go through the zone, so the window is 23 or 25 hours long
/// around DST changes.
pub fn previous_day<Tz: TimeZone>(now: &DateTime<Tz>) -> TimeRangeFilter {
    let tz = now.timezone();
    let date = now.date_naive();
    let today = start_of_day(date, &tz);
    let start = date
        .pred_opt()
        .map(|yesterday| start_of_day(yesterday, &tz))
        .unwrap_or(today);
    TimeRangeFilter::between(start, today)
}

/// The two windows a daily snapshot reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayWindows {
    pub today: TimeRangeFilter,
    pub yesterday: TimeRangeFilter,
}

impl DayWindows {
    pub fn at<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        Self {
            today: today_so_far(now),
            yesterday: previous_day(now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, LocalResult, NaiveDateTime};

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).expect("rfc3339")
    }

    fn naive(s: &str) -> NaiveDateTime {
        s.parse().expect("naive datetime")
    }

    /// UTC+1, with summer time (UTC+2) in 2025 switching at local midnight:
    /// 2025-03-30 00:00 does not exist and 2025-10-25 23:00-24:00 happens twice.
    #[derive(Debug, Clone, Copy)]
    struct MidnightShift;

    impl MidnightShift {
        fn winter() -> FixedOffset {
            FixedOffset::east_opt(3600).unwrap()
        }

        fn summer() -> FixedOffset {
            FixedOffset::east_opt(2 * 3600).unwrap()
        }
    }

    impl TimeZone for MidnightShift {
        type Offset = FixedOffset;

        fn from_offset(_: &FixedOffset) -> Self {
            MidnightShift
        }

        fn offset_from_local_date(&self, local: &NaiveDate) -> LocalResult<FixedOffset> {
            self.offset_from_local_datetime(&local.and_time(NaiveTime::MIN))
        }

        fn offset_from_local_datetime(&self, local: &NaiveDateTime) -> LocalResult<FixedOffset> {
            let fits = |offset: FixedOffset| {
                let utc = *local - TimeDelta::seconds(offset.local_minus_utc().into());
                self.offset_from_utc_datetime(&utc) == offset
            };
            match (fits(Self::summer()), fits(Self::winter())) {
                (true, true) => LocalResult::Ambiguous(Self::summer(), Self::winter()),
                (true, false) => LocalResult::Single(Self::summer()),
                (false, true) => LocalResult::Single(Self::winter()),
                (false, false) => LocalResult::None,
            }
        }

        fn offset_from_utc_date(&self, utc: &NaiveDate) -> FixedOffset {
            self.offset_from_utc_datetime(&utc.and_time(NaiveTime::MIN))
        }

        fn offset_from_utc_datetime(&self, utc: &NaiveDateTime) -> FixedOffset {
            let summer = naive("2025-03-29T23:00:00")..naive("2025-10-25T22:00:00");
            if summer.contains(utc) {
                Self::summer()
            } else {
                Self::winter()
            }
        }
    }

    #[test]
    fn today_window_starts_at_local_midnight() {
        let now = at("2025-03-01T14:30:00+02:00");
        let f = today_so_far(&now);
        assert_eq!(f.start_time().to_rfc3339(), "2025-02-28T22:00:00+00:00");
        assert_eq!(f.end_time().to_rfc3339(), "2025-03-01T12:30:00+00:00");
    }

    #[test]
    fn previous_day_crosses_month_boundary() {
        let now = at("2025-03-01T00:15:00-05:00");
        let f = previous_day(&now);
        assert_eq!(f.start_time().to_rfc3339(), "2025-02-28T05:00:00+00:00");
        assert_eq!(f.end_time().to_rfc3339(), "2025-03-01T05:00:00+00:00");
        assert_eq!(f.end_time() - f.start_time(), TimeDelta::days(1));
    }

    #[test]
    fn start_of_day_in_utc() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let utc = FixedOffset::east_opt(0).unwrap();
        assert_eq!(start_of_day(date, &utc).to_rfc3339(), "2025-01-01T00:00:00+00:00");
    }

    #[test]
    fn skipped_midnight_starts_day_after_the_gap() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 30).unwrap();
        assert_eq!(
            start_of_day(date, &MidnightShift).to_rfc3339(),
            "2025-03-29T23:00:00+00:00"
        );
    }

    #[test]
    fn previous_day_is_short_after_spring_forward() {
        let now = MidnightShift.from_utc_datetime(&naive("2025-03-31T10:00:00"));
        let f = previous_day(&now);
        assert_eq!(f.start_time().to_rfc3339(), "2025-03-29T23:00:00+00:00");
        assert_eq!(f.end_time().to_rfc3339(), "2025-03-30T22:00:00+00:00");
        assert_eq!(f.end_time() - f.start_time(), TimeDelta::hours(23));

        let today = today_so_far(&now);
        assert_eq!(today.start_time(), f.end_time());
    }

    #[test]
    fn previous_day_is_long_after_fall_back() {
        let now = MidnightShift.from_utc_datetime(&naive("2025-10-26T11:00:00"));
        let f = previous_day(&now);
        assert_eq!(f.start_time().to_rfc3339(), "2025-10-24T22:00:00+00:00");
        assert_eq!(f.end_time().to_rfc3339(), "2025-10-25T23:00:00+00:00");
        assert_eq!(f.end_time() - f.start_time(), TimeDelta::hours(25));
    }

    #[test]
    fn day_windows_share_the_midnight_boundary() {
        let now = at("2025-03-01T18:00:00+00:00");
        let w = DayWindows::at(&now);
        assert_eq!(w.yesterday.end_time(), w.today.start_time());
        assert_eq!(w.today.end_time(), now.with_timezone(&Utc));
    }
}
