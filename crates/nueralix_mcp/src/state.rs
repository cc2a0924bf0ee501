use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::Serialize;

use crate::capability::Capability;
use crate::snapshot::{DailyHealthSnapshot, MetricKind};

#[derive(Debug, Serialize, JsonSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    /// Stays until dismissed or the cause goes away.
    Persistent,
    /// Replaced on the next refresh.
    Transient,
}

#[derive(Debug, Serialize, JsonSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NoticeAction {
    RequestPermission,
}

#[derive(Debug, Serialize, JsonSchema, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub action: Option<NoticeAction>,
}

impl Notice {
    pub fn persistent(message: impl Into<String>, action: Option<NoticeAction>) -> Self {
        Self {
            kind: NoticeKind::Persistent,
            message: message.into(),
            action,
        }
    }

    pub fn transient(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Transient,
            message: message.into(),
            action: None,
        }
    }

    /// Transient notice for reads that failed during a refresh.
    pub fn degraded(metrics: &[MetricKind]) -> Option<Self> {
        if metrics.is_empty() {
            return None;
        }
        let names: Vec<&str> = metrics.iter().map(|m| m.title()).collect();
        Some(Self::transient(format!(
            "Couldn't load {}. Showing placeholders.",
            names.join(", ")
        )))
    }
}

/// What the insights screen currently shows.
#[derive(Debug, Serialize, JsonSchema, Clone, PartialEq, Eq)]
pub struct InsightsState {
    pub capability: Capability,
    pub snapshot: Option<DailyHealthSnapshot>,
    pub loading: bool,
    pub notices: Vec<Notice>,
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl InsightsState {
    pub fn transient_notices(&self) -> impl Iterator<Item = &Notice> {
        self.notices
            .iter()
            .filter(|n| n.kind == NoticeKind::Transient)
    }
}

impl Default for InsightsState {
    fn default() -> Self {
        Self {
            capability: Capability::Unknown,
            snapshot: None,
            loading: false,
            notices: Vec::new(),
            refreshed_at: None,
        }
    }
}
