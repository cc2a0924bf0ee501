//! Request counters and latency histograms for bridge calls.
//!
//! Only the `metrics` facade is used here; installing a recorder is left to
//! the host process.

use std::time::Duration;

pub const REQUESTS_TOTAL: &str = "health_connect_requests_total";
pub const REQUEST_SECONDS: &str = "health_connect_request_seconds";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Ok,
    Error,
}

impl Outcome {
    pub fn of<T, E>(result: &Result<T, E>) -> Self {
        if result.is_ok() {
            Outcome::Ok
        } else {
            Outcome::Error
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Outcome::Ok => "ok",
            Outcome::Error => "error",
        }
    }
}

pub fn record_request(operation: &'static str, outcome: Outcome, elapsed: Duration) {
    metrics::counter!(REQUESTS_TOTAL, "operation" => operation, "outcome" => outcome.as_str())
        .increment(1);
    metrics::histogram!(REQUEST_SECONDS, "operation" => operation).record(elapsed.as_secs_f64());
}
