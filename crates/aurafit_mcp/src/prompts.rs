use rmcp::model::{GetPromptResult, PromptMessage, PromptMessageRole};

use crate::types::DashboardResult;

pub fn daily_check_in_prompt(dashboard: &DashboardResult, note: Option<&str>) -> GetPromptResult {
    let note = note
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(|n| format!("\n\nA note from me: {n}"))
        .unwrap_or_default();

    GetPromptResult::new(vec![PromptMessage::new_text(
            PromptMessageRole::User,
            format!(
                "Here is my AuraFit day so far.\n\n{}\nAct as my upbeat fitness coach. Tell me which goals are still open and what I could eat, drink or do in the rest of the day to close them. Use log_meal and log_workout to record anything I tell you I had or did, adjust_water and adjust_sleep for counters, and generate_daily_summary when I say the day is done.{}",
                dashboard.to_markdown(),
                note
            ),
        )])
    .with_description(format!("Check-in for {}", dashboard.date))
}

pub fn plan_tomorrow_prompt(dashboard: &DashboardResult, focus: Option<&str>) -> GetPromptResult {
    let focus = focus
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(|f| format!("\n\nPay special attention to: {f}."))
        .unwrap_or_default();

    GetPromptResult::new(vec![PromptMessage::new_text(
            PromptMessageRole::User,
            format!(
                "Based on today's log below, plan tomorrow for my goal \"{}\".\n\n{}\nInclude:\n1. A calorie and protein target with a rough meal plan\n2. A workout suggestion that fits my recent activity\n3. Water and sleep targets\n4. One habit to change compared to today{}",
                dashboard.goal,
                dashboard.to_markdown(),
                focus
            ),
        )])
    .with_description("Plan tomorrow from today's log")
}
