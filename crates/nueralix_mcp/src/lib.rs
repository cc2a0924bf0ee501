use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;

use rmcp::Json;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    AnnotateAble, GetPromptRequestParams, GetPromptResult, ListPromptsResult, ListResourcesResult,
    PaginatedRequestParam, PaginatedRequestParams, RawResource, ReadResourceRequestParam,
    ReadResourceResult, ResourceContents,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData, RoleServer};
use rmcp::{prompt, prompt_handler, prompt_router, tool, tool_handler, tool_router};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use health_connect_client::HealthDataProvider;

pub mod aggregator;
pub mod capability;
pub mod config;
pub mod content;
pub mod domains;
pub mod error;
pub mod format;
mod prompts;
pub mod services;
pub mod snapshot;
pub mod state;
mod test_utils;

pub use error::{McpError, McpResult};

use capability::{Capability, check_capability};
use config::InsightsConfig;
use content::{Conversation, MenuEntry, Profile, Settings, SettingsUpdate, Tab, WeeklyActivity};
use services::InsightsService;
use snapshot::{DailyHealthSnapshot, MetricCard};
use state::{InsightsState, Notice};

const INSIGHTS_URI: &str = "nueralix://insights/today";
const NAVIGATION_URI: &str = "nueralix://app/navigation";

#[derive(Clone)]
pub struct NueralixMcpHandler {
    insights: InsightsService,
    settings: Arc<Mutex<Settings>>,
    tool_router: rmcp::handler::server::tool::ToolRouter<NueralixMcpHandler>,
    prompt_router: rmcp::handler::server::router::prompt::PromptRouter<NueralixMcpHandler>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct SnapshotResult {
    pub capability: Capability,
    /// "Today's Summary" cards in grid order
    pub cards: Vec<MetricCard>,
    pub snapshot: Option<DailyHealthSnapshot>,
    pub notices: Vec<Notice>,
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl From<InsightsState> for SnapshotResult {
    fn from(state: InsightsState) -> Self {
        Self {
            cards: state
                .snapshot
                .as_ref()
                .map(DailyHealthSnapshot::cards)
                .unwrap_or_default(),
            capability: state.capability,
            snapshot: state.snapshot,
            notices: state.notices,
            refreshed_at: state.refreshed_at,
        }
    }
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct CapabilityResult {
    pub capability: Capability,
    pub notice: Option<Notice>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct ConversationSearchParams {
    /// Case-insensitive text to look for in conversation titles
    pub query: Option<String>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct ConversationsResult {
    pub sections: Vec<MenuEntry>,
    pub conversations: Vec<Conversation>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct TabEntry {
    pub name: Tab,
    pub icon: String,
    pub focused_icon: String,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct NavigationResult {
    pub tabs: Vec<TabEntry>,
    pub drawer: Vec<MenuEntry>,
}

// === Prompt Parameters ===

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct AnalyzeHealthDataParams {
    /// What to focus on, e.g. "sleep" or "activity"
    pub focus: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct SurpriseMeParams {
    /// Optional metric or theme to keep the surprise about
    pub topic: Option<String>,
}

fn navigation() -> NavigationResult {
    NavigationResult {
        tabs: Tab::ALL
            .iter()
            .map(|&tab| TabEntry {
                name: tab,
                icon: tab.icon(false).to_string(),
                focused_icon: tab.icon(true).to_string(),
            })
            .collect(),
        drawer: content::drawer_sections(),
    }
}

fn json_resource<T: Serialize>(uri: &str, value: &T) -> Result<ReadResourceResult, ErrorData> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| ErrorData::internal_error(e.to_string(), None))?;
    Ok(ReadResourceResult::new(vec![
        ResourceContents::TextResourceContents {
            uri: uri.to_string(),
            mime_type: Some("application/json".to_string()),
            text,
            meta: None,
        },
    ]))
}

#[tool_router]
#[prompt_router]
impl NueralixMcpHandler {
    pub fn new(provider: Arc<dyn HealthDataProvider>, config: InsightsConfig) -> Self {
        Self::with_insights(InsightsService::new(provider, config))
    }

    pub fn with_insights(insights: InsightsService) -> Self {
        Self {
            insights,
            settings: Arc::new(Mutex::new(Settings::default())),
            tool_router: Self::tool_router(),
            prompt_router: Self::prompt_router(),
        }
    }

    pub fn insights(&self) -> &InsightsService {
        &self.insights
    }

    pub fn tool_count(&self) -> usize {
        self.tool_router.list_all().len()
    }

    pub fn prompt_count(&self) -> usize {
        self.prompt_router.list_all().len()
    }

    // === Insights ===

    #[tool(
        name = "get_health_snapshot",
        description = "Refresh and return today's health summary: steps, heart rate, sleep and calories, plus any notices"
    )]
    async fn get_health_snapshot(&self) -> Result<Json<SnapshotResult>, String> {
        Ok(Json(self.insights.refresh().await.into()))
    }

    #[tool(
        name = "get_health_capability",
        description = "Check whether Health Connect is available and the needed permissions are granted"
    )]
    async fn get_health_capability(&self) -> Result<Json<CapabilityResult>, String> {
        let capability = check_capability(self.insights.provider()).await;
        Ok(Json(CapabilityResult {
            notice: capability.notice(),
            capability,
        }))
    }

    #[tool(
        name = "request_health_permissions",
        description = "Ask for read access to steps, heart rate, sleep and active calories, then reload the summary"
    )]
    async fn request_health_permissions(&self) -> Result<Json<SnapshotResult>, String> {
        let state = self.insights.request_permissions().await?;
        Ok(Json(state.into()))
    }

    #[tool(name = "dismiss_notice", description = "Dismiss the current notices")]
    async fn dismiss_notice(&self) -> Result<Json<SnapshotResult>, String> {
        Ok(Json(self.insights.dismiss_notices().await.into()))
    }

    #[tool(
        name = "get_weekly_activity",
        description = "Get the weekly activity bar chart series"
    )]
    async fn get_weekly_activity(&self) -> Result<Json<WeeklyActivity>, String> {
        Ok(Json(content::weekly_activity()))
    }

    // === App ===

    #[tool(
        name = "list_conversations",
        description = "List past conversations, optionally filtered by title"
    )]
    async fn list_conversations(
        &self,
        params: Parameters<ConversationSearchParams>,
    ) -> Result<Json<ConversationsResult>, String> {
        let p = params.0;
        Ok(Json(ConversationsResult {
            sections: content::drawer_sections(),
            conversations: content::search_conversations(p.query.as_deref()),
        }))
    }

    #[tool(name = "get_profile", description = "Get the user profile")]
    async fn get_profile(&self) -> Result<Json<Profile>, String> {
        Ok(Json(content::profile()))
    }

    #[tool(name = "get_settings", description = "Get app settings")]
    async fn get_settings(&self) -> Result<Json<Settings>, String> {
        Ok(Json(self.settings.lock().await.clone()))
    }

    #[tool(
        name = "update_settings",
        description = "Toggle dark mode or push notifications"
    )]
    async fn update_settings(
        &self,
        params: Parameters<SettingsUpdate>,
    ) -> Result<Json<Settings>, String> {
        let mut settings = self.settings.lock().await;
        settings.apply(&params.0);
        tracing::info!(
            dark_mode = settings.dark_mode,
            push_notifications = settings.push_notifications,
            "settings updated"
        );
        Ok(Json(settings.clone()))
    }

    // === MCP Prompts ===

    /// Walk through today's metrics with an optional focus
    #[prompt(
        name = "analyze-health-data",
        description = "Analyze today's health data and suggest next steps"
    )]
    async fn analyze_health_data(
        &self,
        params: Parameters<AnalyzeHealthDataParams>,
    ) -> GetPromptResult {
        let focus = params
            .0
            .focus
            .unwrap_or_else(|| "overall wellbeing".to_string());

        prompts::analyze_health_data_prompt(&focus)
    }

    #[prompt(
        name = "surprise-me",
        description = "Share one unexpected insight from today's health data"
    )]
    async fn surprise_me(&self, params: Parameters<SurpriseMeParams>) -> GetPromptResult {
        prompts::surprise_me_prompt(params.0.topic.as_deref())
    }
}

#[tool_handler]
#[prompt_handler(router = self.prompt_router)]
impl rmcp::ServerHandler for NueralixMcpHandler {
    fn get_info(&self) -> rmcp::model::ServerInfo {
        rmcp::model::ServerInfo::new(
            rmcp::model::ServerCapabilities::builder()
                .enable_tools()
                .enable_prompts()
                .enable_resources()
                .build(),
        )
        .with_instructions(
            "Nueralix MCP server - daily health insights from Health Connect \
             (steps, heart rate, sleep, active calories) plus app profile and settings.",
        )
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, ErrorData> {
        let mut today = RawResource::new(INSIGHTS_URI, "Today's Health Insights").no_annotation();
        today.description =
            Some("Latest daily health snapshot with capability and notices".to_string());
        today.mime_type = Some("application/json".to_string());

        let mut nav = RawResource::new(NAVIGATION_URI, "App Navigation").no_annotation();
        nav.description = Some("Tab bar and drawer sections".to_string());
        nav.mime_type = Some("application/json".to_string());

        Ok(ListResourcesResult {
            resources: vec![today, nav],
            next_cursor: None,
            meta: None,
        })
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, ErrorData> {
        match request.uri.as_str() {
            INSIGHTS_URI => {
                // Load on first read; afterwards serve the last published state.
                let mut state = self.insights.current().await;
                if state.snapshot.is_none() {
                    state = self.insights.on_mount().await;
                }
                json_resource(INSIGHTS_URI, &SnapshotResult::from(state))
            }
            NAVIGATION_URI => json_resource(NAVIGATION_URI, &navigation()),
            _ => Err(ErrorData::invalid_params(
                format!("Unknown resource URI: {}", request.uri),
                None,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::HealthMetricsAggregator;
    use crate::format::PLACEHOLDER;
    use crate::test_utils::{MockProvider, fixed_now};
    use health_connect_client::{RecordType, SdkStatus};

    fn handler(provider: MockProvider) -> NueralixMcpHandler {
        NueralixMcpHandler::with_insights(InsightsService::with_clock(
            Arc::new(provider),
            HealthMetricsAggregator::default(),
            fixed_now,
        ))
    }

    #[tokio::test]
    async fn handler_creation() {
        let handler = handler(MockProvider::with_sample_day());
        let _clone = handler.clone();
        let tools = handler.tool_router.list_all();
        for name in [
            "get_health_snapshot",
            "get_health_capability",
            "request_health_permissions",
            "dismiss_notice",
            "get_weekly_activity",
            "list_conversations",
            "get_profile",
            "get_settings",
            "update_settings",
        ] {
            assert!(tools.iter().any(|t| t.name == name), "missing tool {name}");
        }
        assert_eq!(handler.tool_count(), 9, "Should register 9 tools");
        assert_eq!(handler.prompt_count(), 2);
    }

    #[tokio::test]
    async fn snapshot_tool_returns_cards_in_grid_order() {
        let handler = handler(MockProvider::with_sample_day());
        let Json(result) = handler.get_health_snapshot().await.expect("snapshot");
        let values: Vec<&str> = result.cards.iter().map(|c| c.value.as_str()).collect();
        assert_eq!(values, vec!["72 bpm", "5,000", "7h 23m", "1,850"]);
        assert!(result.notices.is_empty());
        assert!(result.refreshed_at.is_some());
    }

    #[tokio::test]
    async fn snapshot_tool_degrades_failed_metric() {
        let handler = handler(MockProvider::with_sample_day().failing(RecordType::Steps));
        let Json(result) = handler.get_health_snapshot().await.expect("snapshot");
        let steps = result
            .cards
            .iter()
            .find(|c| c.title == "Daily Steps")
            .expect("steps card");
        assert_eq!(steps.value, PLACEHOLDER);
        assert_eq!(result.notices.len(), 1);
    }

    #[tokio::test]
    async fn capability_tool_reports_missing_provider() {
        let handler =
            handler(MockProvider::with_sample_day().with_status(SdkStatus::UpdateRequired));
        let Json(result) = handler.get_health_capability().await.expect("capability");
        assert!(!result.capability.is_ready());
        assert!(result.notice.is_some());
    }

    #[tokio::test]
    async fn settings_persist_between_calls() {
        let handler = handler(MockProvider::with_sample_day());
        let Json(before) = handler.get_settings().await.expect("settings");
        assert!(!before.dark_mode);
        handler
            .update_settings(Parameters(SettingsUpdate {
                dark_mode: Some(true),
                push_notifications: Some(false),
            }))
            .await
            .expect("update");
        let Json(after) = handler.get_settings().await.expect("settings");
        assert!(after.dark_mode);
        assert!(!after.push_notifications);
    }

    #[tokio::test]
    async fn conversation_search_filters_titles() {
        let handler = handler(MockProvider::with_sample_day());
        let Json(result) = handler
            .list_conversations(Parameters(ConversationSearchParams {
                query: Some("SLEEP".into()),
            }))
            .await
            .expect("conversations");
        assert_eq!(result.conversations.len(), 1);
        assert_eq!(result.conversations[0].title, "How deep was my sleep");
        assert_eq!(result.sections.len(), 4);
    }

    #[test]
    fn navigation_lists_three_tabs() {
        let nav = navigation();
        assert_eq!(nav.tabs.len(), 3);
        assert_eq!(nav.tabs[1].focused_icon, "person");
        assert_eq!(nav.tabs[1].icon, "person-outline");
    }
}
