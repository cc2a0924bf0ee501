//! Static app content served next to the insights: weekly chart, drawer
//! conversations, profile and settings screens, tab bar.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const APP_VERSION: &str = "1.0.0";
pub const CHART_HEIGHT: u32 = 150;

#[derive(Clone, Debug, Serialize, PartialEq, Eq, JsonSchema)]
pub struct ActivityBar {
    pub day: String,
    pub value: u32,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq, JsonSchema)]
pub struct WeeklyActivity {
    pub bars: Vec<ActivityBar>,
    pub chart_height: u32,
}

const WEEK: [(&str, u32); 7] = [
    ("Mon", 65),
    ("Tue", 80),
    ("Wed", 45),
    ("Thu", 90),
    ("Fri", 75),
    ("Sat", 30),
    ("Sun", 60),
];

pub fn weekly_activity() -> WeeklyActivity {
    WeeklyActivity {
        bars: WEEK
            .iter()
            .map(|&(day, value)| ActivityBar {
                day: day.to_string(),
                value,
            })
            .collect(),
        chart_height: CHART_HEIGHT,
    }
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq, JsonSchema)]
pub struct Conversation {
    pub id: u32,
    pub title: String,
    pub category: String,
}

const CONVERSATION_TITLES: [&str; 8] = [
    "How deep was my sleep",
    "React Native GitHub Integration",
    "Spacing Adjustment Request",
    "HealthConnect React Native Integration",
    "High Blood Pressure Workouts",
    "Ugandan Visa- Free Destinations",
    "Crop photo on Mac",
    "UI Cards Alternatives",
];

pub fn conversations() -> Vec<Conversation> {
    CONVERSATION_TITLES
        .iter()
        .zip(1..)
        .map(|(title, id)| Conversation {
            id,
            title: title.to_string(),
            category: "chats".to_string(),
        })
        .collect()
}

/// Conversations whose title contains `query`, ignoring case. A blank query
/// matches everything.
pub fn search_conversations(query: Option<&str>) -> Vec<Conversation> {
    let needle = query.map(str::trim).unwrap_or_default().to_lowercase();
    conversations()
        .into_iter()
        .filter(|c| needle.is_empty() || c.title.to_lowercase().contains(&needle))
        .collect()
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq, JsonSchema)]
pub struct MenuEntry {
    pub label: String,
    pub icon: String,
}

fn entries(items: &[(&str, &str)]) -> Vec<MenuEntry> {
    items
        .iter()
        .map(|&(label, icon)| MenuEntry {
            label: label.to_string(),
            icon: icon.to_string(),
        })
        .collect()
}

pub fn drawer_sections() -> Vec<MenuEntry> {
    entries(&[
        ("Chats", "chat-bubble-outline"),
        ("Today", "today"),
        ("Last week", "add"),
        ("Google Health Api", "health-and-safety"),
    ])
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq, JsonSchema)]
pub struct Profile {
    pub name: String,
    pub email: String,
    pub options: Vec<MenuEntry>,
}

pub fn profile() -> Profile {
    Profile {
        name: "John Doe".to_string(),
        email: "john.doe@example.com".to_string(),
        options: entries(&[
            ("Edit Profile", "person-outline"),
            ("Notifications", "notifications-none"),
            ("Privacy", "security"),
            ("Help & Support", "help-outline"),
        ]),
    }
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq, JsonSchema)]
pub struct Settings {
    pub dark_mode: bool,
    pub push_notifications: bool,
    pub app_version: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dark_mode: false,
            push_notifications: true,
            app_version: APP_VERSION.to_string(),
        }
    }
}

/// Partial settings change; unset fields keep their value.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
pub struct SettingsUpdate {
    /// Turn dark mode on or off
    pub dark_mode: Option<bool>,
    /// Turn push notifications on or off
    pub push_notifications: Option<bool>,
}

impl Settings {
    pub fn apply(&mut self, update: &SettingsUpdate) {
        if let Some(v) = update.dark_mode {
            self.dark_mode = v;
        }
        if let Some(v) = update.push_notifications {
            self.push_notifications = v;
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq, JsonSchema)]
pub enum Tab {
    Chat,
    Profile,
    Settings,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Chat, Tab::Profile, Tab::Settings];

    pub const fn icon(self, focused: bool) -> &'static str {
        match (self, focused) {
            (Tab::Chat, true) => "chat",
            (Tab::Chat, false) => "chat-outline",
            (Tab::Profile, true) => "person",
            (Tab::Profile, false) => "person-outline",
            (Tab::Settings, true) => "settings",
            (Tab::Settings, false) => "settings-outline",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn week_runs_monday_to_sunday() {
        let week = weekly_activity();
        assert_eq!(week.bars.len(), 7);
        assert_eq!(week.bars[0].day, "Mon");
        assert_eq!(week.bars[3].value, 90);
        assert_eq!(week.bars[6].day, "Sun");
        assert_eq!(week.chart_height, 150);
        assert!(week.bars.iter().all(|b| b.value <= week.chart_height));
    }

    #[test]
    fn search_ignores_case_and_blank_queries() {
        assert_eq!(search_conversations(None).len(), 8);
        assert_eq!(search_conversations(Some("  ")).len(), 8);
        let hits = search_conversations(Some("react native"));
        let titles: Vec<&str> = hits.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "React Native GitHub Integration",
                "HealthConnect React Native Integration"
            ]
        );
        assert!(search_conversations(Some("marathon")).is_empty());
    }

    #[test]
    fn conversations_have_stable_ids() {
        let all = conversations();
        assert_eq!(all[0].id, 1);
        assert_eq!(all[7].title, "UI Cards Alternatives");
        assert!(all.iter().all(|c| c.category == "chats"));
    }

    #[test]
    fn settings_update_is_partial() {
        let mut s = Settings::default();
        assert!(!s.dark_mode);
        assert!(s.push_notifications);
        s.apply(&SettingsUpdate {
            dark_mode: Some(true),
            push_notifications: None,
        });
        assert!(s.dark_mode);
        assert!(s.push_notifications);
        assert_eq!(s.app_version, "1.0.0");
    }

    #[test]
    fn tab_icons_switch_on_focus() {
        assert_eq!(Tab::Chat.icon(true), "chat");
        assert_eq!(Tab::Settings.icon(false), "settings-outline");
        assert_eq!(profile().options.len(), 4);
        assert_eq!(drawer_sections()[3].label, "Google Health Api");
    }
}
