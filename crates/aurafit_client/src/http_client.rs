//! HTTP client implementation for the Gemini `generateContent` API.
//!
//! This module provides a reqwest-based implementation of the [`CoachClient`](crate::CoachClient) trait.

use crate::config::{Config, DEFAULT_ANALYSIS_MODEL, DEFAULT_SUMMARY_MODEL};
use crate::observability::{Operation, record_request};
use crate::retry::RetryPolicy;
use crate::utils::{parse_model_json, require_description};
use crate::{CoachClient, CoachError, DailySnapshot, Nutrients, WorkoutEstimate};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Instant;

const API_VERSION: &str = "v1beta";

const COACH_SYSTEM_INSTRUCTION: &str = "You are a highly motivational and knowledgeable fitness \
and nutrition coach. Your tone is encouraging, positive, and gamified. You are helping a user \
achieve their health goals. Respond only with the markdown summary.";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

impl Content {
    fn user(text: String) -> Self {
        Self {
            role: Some("user".into()),
            parts: vec![Part { text: Some(text) }],
        }
    }

    fn system(text: &str) -> Self {
        Self {
            role: None,
            parts: vec![Part {
                text: Some(text.to_string()),
            }],
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

fn meal_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "calories": { "type": "NUMBER", "description": "Estimated calories" },
            "protein": { "type": "NUMBER", "description": "Estimated protein in grams" },
            "carbs": { "type": "NUMBER", "description": "Estimated carbohydrates in grams" },
            "fat": { "type": "NUMBER", "description": "Estimated fat in grams" }
        },
        "required": ["calories", "protein", "carbs", "fat"]
    })
}

fn workout_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "duration": {
                "type": "NUMBER",
                "description": "Estimated duration of the workout in minutes"
            },
            "caloriesBurned": { "type": "NUMBER", "description": "Estimated calories burned" }
        },
        "required": ["duration", "caloriesBurned"]
    })
}

fn meal_prompt(description: &str) -> String {
    format!(
        "Analyze the nutritional content of this meal: \"{description}\". Provide your best estimate."
    )
}

fn workout_prompt(description: &str) -> String {
    format!(
        "Analyze this workout: \"{description}\". Estimate the duration in minutes and calories burned."
    )
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "None".to_string()
    } else {
        items.join(", ")
    }
}

fn summary_prompt(s: &DailySnapshot) -> String {
    format!(
        "Based on the following daily log for a user whose base weight is {base} kg and goal is to '{goal}', provide a summary and analysis.

User's Goal: {goal}
Base Weight: {base} kg
Current Weight: {current} kg
Date: {date}

Today's Data:
- Calorie Intake: {cal_in:.0} kcal from meals: {meals}
- Calories Burned: {cal_out:.0} kcal from workouts: {workouts}
- Net Calorie Balance: {net:.0} kcal
- Protein Intake: {protein:.0} g
- Water Intake: {water} glasses
- Sleep: {sleep} hours

Your response must be a single string containing markdown.
Your response must include these sections with these exact headings:

### 🌟 Daily Quest Report
Give a brief, super positive summary of the day. Frame their efforts as completing a quest. Mention their calorie balance.

### 🔬 Weight & Goal Analysis
Provide an approximate prediction for weight change based on today's data. Explain it simply. Offer specific advice for their goal of '{goal}'. For example, if they want muscle gain, comment on their protein intake. If they want fat loss, comment on their calorie deficit.

### ✨ Pro-Tip Unlocked!
Give one actionable, inspiring tip for tomorrow. Make it sound like they've unlocked an achievement.

Keep the entire response concise, under 200 words. Use emojis to make it engaging and motivational.",
        base = s.base_weight,
        goal = s.goal,
        current = s.current_weight,
        date = s.date.format("%Y-%m-%d"),
        cal_in = s.calories_in,
        meals = join_or_none(&s.meals),
        cal_out = s.calories_out,
        workouts = join_or_none(&s.workouts),
        net = s.net_calories(),
        protein = s.protein,
        water = s.water_glasses,
        sleep = s.sleep_hours,
    )
}

/// Client for the Gemini API using reqwest.
#[derive(Clone, Debug)]
pub struct GeminiCoachClient {
    base_url: String,
    api_key: SecretString,
    analysis_model: String,
    summary_model: String,
    retry: RetryPolicy,
    client: reqwest::Client,
}

impl GeminiCoachClient {
    /// Create a client with default models, no request timeout and the default retry policy.
    ///
    /// # Arguments
    /// * `base_url` - API root, e.g. "https://generativelanguage.googleapis.com"
    /// * `api_key` - Gemini API key
    pub fn new(base_url: &str, api_key: SecretString) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            analysis_model: DEFAULT_ANALYSIS_MODEL.to_string(),
            summary_model: DEFAULT_SUMMARY_MODEL.to_string(),
            retry: RetryPolicy::default(),
            client: reqwest::Client::new(),
        }
    }

    /// Build a client from loaded configuration, applying its timeout and retry budget.
    pub fn from_config(config: &Config) -> Result<Self, CoachError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            analysis_model: config.analysis_model.clone(),
            summary_model: config.summary_model.clone(),
            retry: RetryPolicy::with_max_retries(config.max_retries),
            client,
        })
    }

    pub fn with_models(
        mut self,
        analysis_model: impl Into<String>,
        summary_model: impl Into<String>,
    ) -> Self {
        self.analysis_model = analysis_model.into();
        self.summary_model = summary_model.into();
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/{API_VERSION}/models/{model}:generateContent",
            self.base_url
        )
    }

    /// Send a request (with retries) and return the concatenated candidate text.
    #[tracing::instrument(skip(self, request), fields(operation = op.as_str()))]
    async fn generate(
        &self,
        op: Operation,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<String, CoachError> {
        let started = Instant::now();
        let result = self
            .retry
            .retry_async(|| self.send_once(model, request), CoachError::is_retryable)
            .await;
        record_request(op, &result, started.elapsed());
        match &result {
            Ok(_) => tracing::debug!(model, "model responded"),
            Err(e) => tracing::warn!(model, error = %e, "model call failed"),
        }
        result
    }

    async fn send_once(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<String, CoachError> {
        let resp = self
            .client
            .post(self.endpoint(model))
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(request)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(self.error_from_response(resp).await);
        }
        let body = resp.text().await?;
        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| CoachError::MalformedPayload(format!("response envelope: {e}")))?;
        extract_text(parsed)
    }

    /// Extract error information from a failed response.
    async fn error_from_response(&self, resp: reqwest::Response) -> CoachError {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .map(|b| b.error.message)
            .unwrap_or(body);
        let snippet: String = message.chars().take(256).collect();
        CoachError::from_status(status, snippet)
    }

    fn structured_request(prompt: String, schema: serde_json::Value) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content::user(prompt)],
            system_instruction: None,
            generation_config: Some(GenerationConfig {
                response_mime_type: "application/json",
                response_schema: schema,
            }),
        }
    }
}

fn extract_text(response: GenerateContentResponse) -> Result<String, CoachError> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    if text.trim().is_empty() {
        return Err(CoachError::EmptyResponse);
    }
    Ok(text)
}

#[async_trait]
impl CoachClient for GeminiCoachClient {
    async fn analyze_meal(&self, description: &str) -> Result<Nutrients, CoachError> {
        let description = require_description(description)?;
        let request = Self::structured_request(meal_prompt(description), meal_schema());
        let text = self
            .generate(Operation::AnalyzeMeal, &self.analysis_model, &request)
            .await?;
        parse_model_json::<Nutrients>(&text)?.validated()
    }

    async fn analyze_workout(&self, description: &str) -> Result<WorkoutEstimate, CoachError> {
        let description = require_description(description)?;
        let request = Self::structured_request(workout_prompt(description), workout_schema());
        let text = self
            .generate(Operation::AnalyzeWorkout, &self.analysis_model, &request)
            .await?;
        parse_model_json::<WorkoutEstimate>(&text)?.validated()
    }

    async fn generate_daily_summary(
        &self,
        snapshot: &DailySnapshot,
    ) -> Result<String, CoachError> {
        let request = GenerateContentRequest {
            contents: vec![Content::user(summary_prompt(snapshot))],
            system_instruction: Some(Content::system(COACH_SYSTEM_INSTRUCTION)),
            generation_config: None,
        };
        self.generate(Operation::DailySummary, &self.summary_model, &request)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> DailySnapshot {
        DailySnapshot {
            date: chrono::NaiveDate::from_ymd_opt(2025, 6, 2).expect("date"),
            goal: "Lose belly fat and gain lean muscle".into(),
            base_weight: 70.0,
            current_weight: 69.4,
            calories_in: 800.4,
            calories_out: 250.0,
            protein: 60.0,
            water_glasses: 5,
            sleep_hours: 7.5,
            meals: vec!["Oats".into(), "Chicken salad".into()],
            workouts: vec![],
        }
    }

    #[test]
    fn client_new_trims_trailing_slash() {
        let client = GeminiCoachClient::new("http://localhost/", SecretString::new("k".into()));
        assert_eq!(
            client.endpoint("gemini-2.5-flash"),
            "http://localhost/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn summary_prompt_carries_totals_and_headings() {
        let p = summary_prompt(&snapshot());
        assert!(p.contains("Calorie Intake: 800 kcal from meals: Oats, Chicken salad"));
        assert!(p.contains("from workouts: None"));
        assert!(p.contains("Net Calorie Balance: 550 kcal"));
        assert!(p.contains("### 🌟 Daily Quest Report"));
        assert!(p.contains("### 🔬 Weight & Goal Analysis"));
        assert!(p.contains("### ✨ Pro-Tip Unlocked!"));
    }

    #[test]
    fn structured_request_serializes_camel_case() {
        let req = GeminiCoachClient::structured_request(meal_prompt("oats"), meal_schema());
        let v = serde_json::to_value(&req).expect("serialize");
        assert_eq!(
            v["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(v["generationConfig"]["responseSchema"]["type"], "OBJECT");
        assert!(v.get("systemInstruction").is_none());
        assert_eq!(v["contents"][0]["role"], "user");
    }

    #[test]
    fn extract_text_joins_parts_and_rejects_empty() {
        let resp: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"role": "model", "parts": [{"text": "a"}, {"text": "b"}]}}]
        }))
        .expect("parse");
        assert_eq!(extract_text(resp).unwrap(), "ab");

        let empty: GenerateContentResponse =
            serde_json::from_value(json!({"candidates": []})).expect("parse");
        assert!(matches!(extract_text(empty), Err(CoachError::EmptyResponse)));
    }
}
