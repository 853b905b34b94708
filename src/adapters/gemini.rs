use crate::adapters::http::truncate_body;
use crate::config::BotConfig;
use crate::domain::model::Prompt;
use crate::domain::ports::PromptSource;
use crate::utils::error::{BotError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

const SERVICE: &str = "gemini";

/// Asks Gemini `generateContent` for an image prompt.
pub struct GeminiPromptGenerator {
    client: Client,
    endpoint: String,
    api_key: String,
    instruction: String,
    fallback: String,
}

impl GeminiPromptGenerator {
    pub fn new(client: Client, config: &BotConfig) -> Self {
        Self {
            client,
            endpoint: config.settings.endpoints.text_endpoint.clone(),
            api_key: config.credentials.text_api_key.clone(),
            instruction: config.settings.prompt.instruction.clone(),
            fallback: config.settings.prompt.fallback.clone(),
        }
    }

    fn request_body(&self) -> Value {
        json!({ "contents": [{ "parts": [{ "text": self.instruction }] }] })
    }

    async fn request_prompt(&self) -> Result<Prompt> {
        tracing::debug!("Making Gemini request to: {}", self.endpoint);
        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&self.request_body())
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Gemini response status: {}", status);
        let body = response.text().await?;

        if !status.is_success() {
            return Err(BotError::UpstreamStatus {
                service: SERVICE.to_string(),
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let data: Value = serde_json::from_str(&body)?;
        extract_prompt(&data)
    }
}

/// Reads `candidates[0].content`: either a plain string, or an object whose
/// `parts[].text` values are concatenated. No other text is added or removed.
pub fn extract_prompt(data: &Value) -> Result<Prompt> {
    let malformed = |details: &str| BotError::MalformedResponse {
        service: SERVICE.to_string(),
        details: details.to_string(),
    };

    let content = data
        .get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("content"))
        .ok_or_else(|| malformed("missing candidates[0].content"))?;

    let text = match content {
        Value::String(text) => text.clone(),
        Value::Object(_) => {
            let parts = content
                .get("parts")
                .and_then(|p| p.as_array())
                .ok_or_else(|| malformed("content has no parts"))?;
            parts
                .iter()
                .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
                .collect::<String>()
        }
        _ => return Err(malformed("content is neither text nor an object")),
    };

    Prompt::generated(text).ok_or_else(|| malformed("generated text is empty"))
}

#[async_trait]
impl PromptSource for GeminiPromptGenerator {
    async fn generate_prompt(&self) -> Prompt {
        match self.request_prompt().await {
            Ok(prompt) => prompt,
            Err(e) => {
                tracing::warn!("⚠️ Gemini API error: {}", e);
                tracing::info!("Using fallback prompt");
                Prompt::fallback(&self.fallback, e.to_string())
            }
        }
    }
}
