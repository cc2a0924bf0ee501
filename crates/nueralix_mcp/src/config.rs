use chrono::{FixedOffset, Local, Utc};
use health_connect_client::utils::DayWindows;

use crate::error::McpError;
use crate::format::DEFAULT_GROUPING_SEPARATOR;

/// Settings for how the insights day is cut and how numbers are shown.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InsightsConfig {
    /// Fixed zone for "today". `None` follows the host's local zone,
    /// DST changes included.
    pub utc_offset: Option<FixedOffset>,
    pub grouping_separator: char,
}

impl Default for InsightsConfig {
    fn default() -> Self {
        Self {
            utc_offset: None,
            grouping_separator: DEFAULT_GROUPING_SEPARATOR,
        }
    }
}

impl InsightsConfig {
    pub fn from_env() -> Result<Self, McpError> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    pub fn from_env_with<F>(mut get: F) -> Result<Self, McpError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let utc_offset = match get("NUERALIX_UTC_OFFSET_MINUTES") {
            Some(raw) => {
                let minutes: i32 = raw.trim().parse().map_err(|_| {
                    McpError::Config(format!(
                        "NUERALIX_UTC_OFFSET_MINUTES must be an integer, got {raw:?}"
                    ))
                })?;
                let offset = minutes
                    .checked_mul(60)
                    .and_then(FixedOffset::east_opt)
                    .ok_or_else(|| {
                        McpError::Config(format!(
                            "NUERALIX_UTC_OFFSET_MINUTES out of range: {minutes}"
                        ))
                    })?;
                Some(offset)
            }
            None => None,
        };

        let grouping_separator = match get("NUERALIX_GROUPING_SEPARATOR") {
            Some(raw) => {
                let mut chars = raw.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => c,
                    _ => {
                        return Err(McpError::Config(format!(
                            "NUERALIX_GROUPING_SEPARATOR must be a single character, got {raw:?}"
                        )));
                    }
                }
            }
            None => DEFAULT_GROUPING_SEPARATOR,
        };

        Ok(Self {
            utc_offset,
            grouping_separator,
        })
    }

    /// Today-so-far and yesterday windows as of now in the configured zone.
    pub fn day_windows(&self) -> DayWindows {
        match self.utc_offset {
            Some(offset) => DayWindows::at(&Utc::now().with_timezone(&offset)),
            None => DayWindows::at(&Local::now()),
        }
    }
}
