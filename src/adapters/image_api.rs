use crate::adapters::http::truncate_body;
use crate::config::BotConfig;
use crate::domain::model::{ImageReference, Prompt};
use crate::domain::ports::ImageSource;
use crate::utils::error::{BotError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;

const SERVICE: &str = "image-api";

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    prompt: &'a str,
    size: &'a str,
}

/// Client for the `{prompt, size}` → `{url}` image generation API.
pub struct ImageApiGenerator {
    client: Client,
    endpoint: String,
    api_key: String,
    size: String,
}

impl ImageApiGenerator {
    pub fn new(client: Client, config: &BotConfig) -> Self {
        Self {
            client,
            endpoint: config.settings.endpoints.image_endpoint.clone(),
            api_key: config.credentials.image_api_key.clone(),
            size: config.settings.prompt.image_size.clone(),
        }
    }

    async fn request_image(&self, prompt: &Prompt) -> Result<ImageReference> {
        tracing::debug!("Making image request to: {}", self.endpoint);
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&GenerateRequest {
                prompt: prompt.text(),
                size: &self.size,
            })
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Image API response status: {}", status);
        let body = response.text().await?;

        // 只接受 200，其他 2xx 也當失敗
        if status != StatusCode::OK {
            return Err(BotError::UpstreamStatus {
                service: SERVICE.to_string(),
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let data: serde_json::Value = serde_json::from_str(&body)?;
        match data.get("url").and_then(|u| u.as_str()) {
            Some(url) if !url.trim().is_empty() => Ok(ImageReference::new(url.trim())),
            _ => Err(BotError::MalformedResponse {
                service: SERVICE.to_string(),
                details: "response has no url field".to_string(),
            }),
        }
    }
}

#[async_trait]
impl ImageSource for ImageApiGenerator {
    async fn generate_image(&self, prompt: &Prompt) -> Result<ImageReference> {
        let result = self.request_image(prompt).await;
        match &result {
            Ok(image) => tracing::info!("🖼️ Image generated: {}", image),
            Err(e) => tracing::error!("❌ Image generation failed: {}", e),
        }
        result
    }
}
