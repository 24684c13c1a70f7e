//! Gemini `generateContent` client.

use super::types::{GenerateResponse, TaskSuggestion};
use super::AssistError;
use crate::core::settings::AppSettings;
use serde_json::{json, Value};
use std::time::Duration;

const ASSIST_TIMEOUT: Duration = Duration::from_secs(30);

const SYSTEM_INSTRUCTION: &str = "You are a helpful project management assistant. Your goal is to help users refine task descriptions, suggest categories, estimate priorities, and break down tasks into actionable subtasks.";

fn prompt(title: &str, description: &str) -> String {
    format!(
        "Task Title: \"{}\". Current Description: \"{}\".\nPlease generate a better description, suggest a one-word category, estimate priority (Low, Medium, High), and provide a list of 3-5 subtasks to complete this main task.",
        title, description
    )
}

fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "description": {
                "type": "STRING",
                "description": "A clearer, concise description of the task."
            },
            "category": {
                "type": "STRING",
                "description": "A short category name (e.g., Design, Backend, Marketing)."
            },
            "priority": { "type": "STRING", "enum": ["Low", "Medium", "High"] },
            "subTasks": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "A list of actionable subtasks."
            }
        },
        "required": ["description", "category", "priority", "subTasks"]
    })
}

pub struct GeminiClient {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(endpoint: &str, model: &str, api_key: &str) -> Result<Self, AssistError> {
        let client = reqwest::Client::builder()
            .timeout(ASSIST_TIMEOUT)
            .build()
            .map_err(AssistError::Request)?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Endpoint and model from settings. `api_key` usually comes from
    /// [`assist_api_key`](crate::core::settings::assist_api_key).
    pub fn from_settings(settings: &AppSettings, api_key: Option<String>) -> Result<Self, AssistError> {
        let api_key = api_key.ok_or(AssistError::MissingApiKey)?;
        Self::new(&settings.assist_endpoint, &settings.assist_model, &api_key)
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }

    pub async fn suggest(&self, title: &str, description: &str) -> Result<TaskSuggestion, AssistError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(AssistError::TitleRequired);
        }

        let body = json!({
            "systemInstruction": { "parts": [{ "text": SYSTEM_INSTRUCTION }] },
            "contents": [{ "role": "user", "parts": [{ "text": prompt(title, description) }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": response_schema()
            }
        });

        tracing::debug!(target: "assist", model = %self.model, "Requesting task suggestion");

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(AssistError::Request)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(target: "assist", status, "Suggestion request rejected");
            return Err(AssistError::Status { status, body });
        }

        let generated: GenerateResponse = response.json().await.map_err(AssistError::Request)?;
        let text = generated.first_text().ok_or(AssistError::EmptyResponse)?;
        let suggestion: TaskSuggestion = serde_json::from_str(text)?;

        tracing::info!(
            target: "assist",
            category = %suggestion.category,
            sub_tasks = suggestion.sub_tasks.len(),
            "Suggestion received"
        );
        Ok(suggestion)
    }
}
