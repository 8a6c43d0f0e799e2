use std::sync::Arc;

use rmcp::Json;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    AnnotateAble, GetPromptRequestParams, GetPromptResult, ListPromptsResult, ListResourcesResult,
    PaginatedRequestParams, RawResource, ReadResourceRequestParams, ReadResourceResult,
    ResourceContents,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData, RoleServer};
use rmcp::{prompt, prompt_handler, prompt_router, tool, tool_handler, tool_router};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use aurafit_client::CoachClient;

pub mod config;
pub mod domains;
pub mod error;
pub mod logging;
mod prompts;
pub mod services;
pub mod state;
pub mod types;

#[cfg(test)]
mod test_utils;

pub use config::ProfileConfig;
pub use error::{McpError, McpResult};
pub use services::TrackerService;
pub use state::{LoadingStates, Notification, NotificationLevel, OperationKind};
pub use types::*;

pub const DASHBOARD_URI: &str = "aurafit://today/dashboard";

#[derive(Clone)]
pub struct AuraFitMcpHandler {
    service: TrackerService,
    tool_router: rmcp::handler::server::tool::ToolRouter<AuraFitMcpHandler>,
    prompt_router: rmcp::handler::server::router::prompt::PromptRouter<AuraFitMcpHandler>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct DailyCheckInParams {
    /// Anything the coach should know about today (mood, cravings, soreness)
    pub note: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct PlanTomorrowParams {
    /// Optional focus for tomorrow, e.g. "more protein" or "rest day"
    pub focus: Option<String>,
}

#[tool_router]
#[prompt_router]
impl AuraFitMcpHandler {
    pub fn new(client: Arc<dyn CoachClient>, profile: &ProfileConfig) -> Self {
        Self::with_service(TrackerService::for_today(client, profile))
    }

    pub fn with_service(service: TrackerService) -> Self {
        Self {
            service,
            tool_router: Self::tool_router(),
            prompt_router: Self::prompt_router(),
        }
    }

    pub fn service(&self) -> &TrackerService {
        &self.service
    }

    pub fn tool_count(&self) -> usize {
        self.tool_router.list_all().len()
    }

    pub fn prompt_count(&self) -> usize {
        self.prompt_router.list_all().len()
    }

    #[tool(
        name = "log_meal",
        description = "Log a meal from a free-text description; calories and macros are estimated by the coach"
    )]
    async fn log_meal(
        &self,
        params: Parameters<DescriptionParams>,
    ) -> Result<Json<MealLoggedResult>, String> {
        let res = self.service.log_meal(&params.0.description).await?;
        Ok(Json(res))
    }

    #[tool(
        name = "log_workout",
        description = "Log a workout from a free-text description; duration and calories burned are estimated by the coach"
    )]
    async fn log_workout(
        &self,
        params: Parameters<DescriptionParams>,
    ) -> Result<Json<WorkoutLoggedResult>, String> {
        let res = self.service.log_workout(&params.0.description).await?;
        Ok(Json(res))
    }

    #[tool(name = "adjust_water", description = "Add or remove glasses of water")]
    async fn adjust_water(
        &self,
        params: Parameters<WaterParams>,
    ) -> Result<Json<UpdateResult>, String> {
        Ok(Json(self.service.adjust_water(params.0.delta).await))
    }

    #[tool(name = "adjust_sleep", description = "Add or remove hours of sleep")]
    async fn adjust_sleep(
        &self,
        params: Parameters<SleepParams>,
    ) -> Result<Json<UpdateResult>, String> {
        Ok(Json(self.service.adjust_sleep(params.0.delta).await))
    }

    #[tool(
        name = "set_weight",
        description = "Record today's body weight in kilograms"
    )]
    async fn set_weight(
        &self,
        params: Parameters<WeightParams>,
    ) -> Result<Json<UpdateResult>, String> {
        Ok(Json(self.service.set_weight(params.0.weight_kg).await))
    }

    #[tool(
        name = "set_goal",
        description = "Replace the fitness goal; a goal mentioning \"gain\" raises the calorie target"
    )]
    async fn set_goal(&self, params: Parameters<GoalParams>) -> Result<Json<UpdateResult>, String> {
        let res = self.service.set_goal(&params.0.goal).await?;
        Ok(Json(res))
    }

    #[tool(
        name = "get_dashboard",
        description = "Today's log with totals, goal progress, loading states and the latest summary"
    )]
    async fn get_dashboard(&self) -> Result<Json<DashboardResult>, String> {
        Ok(Json(self.service.dashboard().await))
    }

    #[tool(
        name = "generate_daily_summary",
        description = "Ask the coach for a narrative summary of the day; replaces any previous summary"
    )]
    async fn generate_daily_summary(&self) -> Result<Json<SummaryResult>, String> {
        let res = self.service.generate_summary().await?;
        Ok(Json(res))
    }

    /// Review the day so far and close open goals
    #[prompt(
        name = "daily-check-in",
        description = "Review today's log and get suggestions to close open goals"
    )]
    async fn daily_check_in(&self, params: Parameters<DailyCheckInParams>) -> GetPromptResult {
        let dashboard = self.service.dashboard().await;
        prompts::daily_check_in_prompt(&dashboard, params.0.note.as_deref())
    }

    /// Turn today's log into a plan for tomorrow
    #[prompt(
        name = "plan-tomorrow",
        description = "Plan tomorrow's meals, training, water and sleep from today's log"
    )]
    async fn plan_tomorrow(&self, params: Parameters<PlanTomorrowParams>) -> GetPromptResult {
        let dashboard = self.service.dashboard().await;
        prompts::plan_tomorrow_prompt(&dashboard, params.0.focus.as_deref())
    }
}

#[tool_handler]
#[prompt_handler(router = self.prompt_router)]
impl rmcp::ServerHandler for AuraFitMcpHandler {
    fn get_info(&self) -> rmcp::model::ServerInfo {
        rmcp::model::ServerInfo::new(
            rmcp::model::ServerCapabilities::builder()
                .enable_tools()
                .enable_prompts()
                .enable_resources()
                .build(),
        )
        .with_instructions(
            "AuraFit MCP server - log meals and workouts in plain language, track water, \
             sleep and weight, follow daily goal progress and get a coach's summary of the day.",
        )
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, ErrorData> {
        let mut res = RawResource::new(DASHBOARD_URI, "Today's Dashboard").no_annotation();
        res.description =
            Some("Today's meals, workouts, totals, goal progress and latest summary".to_string());
        res.mime_type = Some("application/json".to_string());

        Ok(ListResourcesResult {
            resources: vec![res],
            next_cursor: None,
            meta: None,
        })
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, ErrorData> {
        if request.uri != DASHBOARD_URI {
            return Err(ErrorData::invalid_params(
                format!("Unknown resource URI: {}", request.uri),
                None,
            ));
        }
        let dashboard = self.service.dashboard().await;
        let text = serde_json::to_string_pretty(&dashboard)
            .map_err(|e| ErrorData::internal_error(McpError::from(e).to_string(), None))?;

        Ok(ReadResourceResult::new(vec![
            ResourceContents::TextResourceContents {
                uri: request.uri.clone(),
                mime_type: Some("application/json".to_string()),
                text,
                meta: None,
            },
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockCoach;

    fn handler(mock: Arc<MockCoach>) -> AuraFitMcpHandler {
        AuraFitMcpHandler::new(mock, &ProfileConfig::default())
    }

    #[tokio::test]
    async fn handler_creation() {
        let handler = handler(Arc::new(MockCoach::new()));
        let _clone = handler.clone();
        let tools = handler.tool_router.list_all();
        for name in [
            "log_meal",
            "log_workout",
            "adjust_water",
            "adjust_sleep",
            "set_weight",
            "set_goal",
            "get_dashboard",
            "generate_daily_summary",
        ] {
            assert!(tools.iter().any(|t| t.name == name), "missing tool {name}");
        }
        assert_eq!(handler.tool_count(), 8);
        assert_eq!(handler.prompt_count(), 2);
    }

    #[tokio::test]
    async fn log_meal_tool_updates_dashboard() {
        let handler = handler(Arc::new(MockCoach::new()));
        let Json(res) = handler
            .log_meal(Parameters(DescriptionParams {
                description: "chicken and rice".into(),
            }))
            .await
            .unwrap();
        assert_eq!(res.meal.calories, 500.0);

        let Json(dash) = handler.get_dashboard().await.unwrap();
        assert_eq!(dash.meals.len(), 1);
        assert_eq!(dash.totals.total_protein, 40.0);
        assert_eq!(dash.net_calories, 500.0);
    }

    #[tokio::test]
    async fn blank_meal_is_a_tool_error() {
        let mock = Arc::new(MockCoach::new());
        let handler = handler(mock.clone());
        let err = handler
            .log_meal(Parameters(DescriptionParams {
                description: "  ".into(),
            }))
            .await
            .err()
            .expect("expected an error");
        assert!(err.contains("must not be empty"));
        assert_eq!(mock.meal_calls(), 0);
    }

    #[tokio::test]
    async fn upstream_failure_is_reported_as_text() {
        let handler = handler(Arc::new(MockCoach::failing()));
        let err = handler
            .generate_daily_summary()
            .await
            .err()
            .expect("expected an error");
        assert!(err.starts_with("Coach error"));
    }

    #[tokio::test]
    async fn counter_tools_report_new_values() {
        let handler = handler(Arc::new(MockCoach::new()));
        let Json(res) = handler
            .adjust_sleep(Parameters(SleepParams { delta: 0.5 }))
            .await
            .unwrap();
        assert_eq!(res.sleep_hours, 8.0);
        let Json(res) = handler
            .adjust_water(Parameters(WaterParams { delta: -2 }))
            .await
            .unwrap();
        assert_eq!(res.water_intake, 0);
        let Json(res) = handler
            .set_weight(Parameters(WeightParams { weight_kg: 69.4 }))
            .await
            .unwrap();
        assert_eq!(res.current_weight, 69.4);
    }

    #[tokio::test]
    async fn prompts_embed_the_dashboard() {
        let handler = handler(Arc::new(MockCoach::new()));
        handler.service().adjust_water(3).await;
        let res = handler
            .plan_tomorrow(Parameters(PlanTomorrowParams {
                focus: Some("more protein".into()),
            }))
            .await;
        let text = serde_json::to_string(&res.messages).unwrap();
        assert!(text.contains("Water: 3 glasses"));
        assert!(text.contains("more protein"));

        let res = handler
            .daily_check_in(Parameters(DailyCheckInParams { note: None }))
            .await;
        assert!(res.description.unwrap().starts_with("Check-in for"));
    }
}
