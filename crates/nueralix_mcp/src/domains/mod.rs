//! Per-metric derivations used by the aggregator.
//!
//! Each module turns the raw records of one metric into a
//! [`MetricSummary`](crate::snapshot::MetricSummary). They are pure functions:
//! no provider access, no clock.
//!
//! # Modules
//!
//! - [`steps`]: today's total compared with yesterday's
//! - [`heart_rate`]: latest sample in today's window
//! - [`sleep`]: duration of the latest sleep session
//! - [`calories`]: active energy burned today

pub mod calories;
pub mod heart_rate;
pub mod sleep;
pub mod steps;
