//! Availability -> permission check, collapsed into a single state.

use health_connect_client::{HealthDataProvider, INSIGHTS_PERMISSIONS, Permission, SdkStatus};
use schemars::JsonSchema;
use serde::Serialize;

use crate::state::{Notice, NoticeAction};

#[derive(Clone, Debug, Serialize, PartialEq, Eq, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UnavailableReason {
    ProviderMissing,
    UpdateRequired,
    PermissionsMissing { missing: Vec<Permission> },
    ProviderError { message: String },
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq, JsonSchema)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Capability {
    /// Not checked yet.
    Unknown,
    Unavailable { reason: UnavailableReason },
    /// Provider present and every insights permission granted.
    Ready,
}

impl Capability {
    pub fn is_ready(&self) -> bool {
        matches!(self, Capability::Ready)
    }

    /// The persistent notice shown while this capability blocks the screen.
    pub fn notice(&self) -> Option<Notice> {
        let Capability::Unavailable { reason } = self else {
            return None;
        };
        let notice = match reason {
            UnavailableReason::ProviderMissing => {
                Notice::persistent("Health Connect is not available on this device.", None)
            }
            UnavailableReason::UpdateRequired => Notice::persistent(
                "Health Connect needs to be updated before health data can be shown.",
                None,
            ),
            UnavailableReason::PermissionsMissing { missing } => Notice::persistent(
                format!(
                    "Allow access to {} to see your health insights.",
                    missing
                        .iter()
                        .map(|p| p.record_type.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
                Some(NoticeAction::RequestPermission),
            ),
            UnavailableReason::ProviderError { message } => Notice::persistent(
                format!("Could not reach Health Connect: {message}"),
                None,
            ),
        };
        Some(notice)
    }
}

/// Permissions from `required` absent in `granted`, in `required` order.
pub fn missing_permissions(granted: &[Permission], required: &[Permission]) -> Vec<Permission> {
    required
        .iter()
        .filter(|p| !granted.contains(p))
        .copied()
        .collect()
}

pub async fn check_capability(provider: &dyn HealthDataProvider) -> Capability {
    let status = match provider.sdk_status().await {
        Ok(s) => s,
        Err(e) => {
            return Capability::Unavailable {
                reason: UnavailableReason::ProviderError {
                    message: e.to_string(),
                },
            };
        }
    };
    match status {
        SdkStatus::Available => {}
        SdkStatus::UpdateRequired => {
            return Capability::Unavailable {
                reason: UnavailableReason::UpdateRequired,
            };
        }
        SdkStatus::Unavailable | SdkStatus::Unknown => {
            return Capability::Unavailable {
                reason: UnavailableReason::ProviderMissing,
            };
        }
    }

    let granted = match provider.granted_permissions().await {
        Ok(g) => g,
        Err(e) => {
            return Capability::Unavailable {
                reason: UnavailableReason::ProviderError {
                    message: e.to_string(),
                },
            };
        }
    };
    let missing = missing_permissions(&granted, &INSIGHTS_PERMISSIONS);
    if missing.is_empty() {
        Capability::Ready
    } else {
        Capability::Unavailable {
            reason: UnavailableReason::PermissionsMissing { missing },
        }
    }
}
