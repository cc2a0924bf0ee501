//! Immutable per-metric summaries and the daily snapshot that groups them.

use schemars::JsonSchema;
use serde::Serialize;

use crate::format::PLACEHOLDER;

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Steps,
    HeartRate,
    Sleep,
    Calories,
}

impl MetricKind {
    pub const ALL: [MetricKind; 4] = [
        MetricKind::HeartRate,
        MetricKind::Steps,
        MetricKind::Sleep,
        MetricKind::Calories,
    ];

    pub const fn title(self) -> &'static str {
        match self {
            MetricKind::Steps => "Daily Steps",
            MetricKind::HeartRate => "Heart Rate",
            MetricKind::Sleep => "Sleep",
            MetricKind::Calories => "Calories",
        }
    }

    pub const fn icon(self) -> &'static str {
        match self {
            MetricKind::Steps => "directions-walk",
            MetricKind::HeartRate => "favorite",
            MetricKind::Sleep => "nightlight",
            MetricKind::Calories => "local-fire-department",
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Up,
    Down,
    Neutral,
}

impl Trend {
    /// Direction of a signed change.
    pub fn of_delta(delta: i64) -> Self {
        match delta.signum() {
            1 => Trend::Up,
            -1 => Trend::Down,
            _ => Trend::Neutral,
        }
    }
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq, JsonSchema)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum MetricValue {
    Reading(String),
    NoData,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq, JsonSchema)]
pub struct MetricSummary {
    pub value: MetricValue,
    pub trend: Trend,
    pub change: String,
}

pub const NO_DATA_CHANGE: &str = "No data";

impl MetricSummary {
    pub fn reading(value: impl Into<String>, trend: Trend, change: impl Into<String>) -> Self {
        Self {
            value: MetricValue::Reading(value.into()),
            trend,
            change: change.into(),
        }
    }

    pub fn no_data() -> Self {
        Self::no_data_with(NO_DATA_CHANGE)
    }

    /// No reading, but a change description other than the default.
    pub fn no_data_with(change: impl Into<String>) -> Self {
        Self {
            value: MetricValue::NoData,
            trend: Trend::Neutral,
            change: change.into(),
        }
    }

    pub fn display_value(&self) -> &str {
        match &self.value {
            MetricValue::Reading(s) => s,
            MetricValue::NoData => PLACEHOLDER,
        }
    }

    pub fn has_data(&self) -> bool {
        matches!(self.value, MetricValue::Reading(_))
    }
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq, JsonSchema)]
pub struct DailyHealthSnapshot {
    pub steps: MetricSummary,
    pub heart_rate: MetricSummary,
    pub sleep: MetricSummary,
    pub calories: MetricSummary,
}

/// One tile of the "Today's Summary" grid.
#[derive(Clone, Debug, Serialize, PartialEq, Eq, JsonSchema)]
pub struct MetricCard {
    pub metric: MetricKind,
    pub title: String,
    pub icon: String,
    pub value: String,
    pub trend: Trend,
    pub change: String,
}

impl DailyHealthSnapshot {
    pub fn no_data() -> Self {
        Self {
            steps: MetricSummary::no_data(),
            heart_rate: MetricSummary::no_data(),
            sleep: MetricSummary::no_data(),
            calories: MetricSummary::no_data(),
        }
    }

    pub fn get(&self, kind: MetricKind) -> &MetricSummary {
        match kind {
            MetricKind::Steps => &self.steps,
            MetricKind::HeartRate => &self.heart_rate,
            MetricKind::Sleep => &self.sleep,
            MetricKind::Calories => &self.calories,
        }
    }

    /// Cards in grid order.
    pub fn cards(&self) -> Vec<MetricCard> {
        MetricKind::ALL
            .iter()
            .map(|&kind| {
                let summary = self.get(kind);
                MetricCard {
                    metric: kind,
                    title: kind.title().to_string(),
                    icon: kind.icon().to_string(),
                    value: summary.display_value().to_string(),
                    trend: summary.trend,
                    change: summary.change.clone(),
                }
            })
            .collect()
    }
}
