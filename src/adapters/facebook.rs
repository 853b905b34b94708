use crate::adapters::http::truncate_body;
use crate::config::BotConfig;
use crate::domain::model::{ImageReference, PostResult, Prompt};
use crate::domain::ports::Publisher;
use crate::utils::error::{BotError, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;

/// Uploads photos to a Facebook page through the Graph API.
pub struct FacebookPublisher {
    client: Client,
    photos_url: String,
    access_token: String,
}

impl FacebookPublisher {
    pub fn new(client: Client, config: &BotConfig) -> Self {
        Self {
            client,
            photos_url: config.photos_url(),
            access_token: config.credentials.page_access_token.clone(),
        }
    }

    async fn download(&self, image: &ImageReference) -> Result<Vec<u8>> {
        tracing::debug!("Downloading image from: {}", image.url);
        let response = self.client.get(&image.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BotError::UpstreamStatus {
                service: "image-download".to_string(),
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let bytes = response.bytes().await?;
        tracing::debug!("Downloaded {} bytes", bytes.len());
        Ok(bytes.to_vec())
    }

    async fn upload(
        &self,
        image: &ImageReference,
        data: Vec<u8>,
        caption: &Prompt,
    ) -> Result<PostResult> {
        let form = Form::new()
            .part("source", Part::bytes(data).file_name(file_name(image)))
            .text("caption", caption.text().to_string())
            .text("access_token", self.access_token.clone());

        tracing::debug!("Uploading photo to: {}", self.photos_url);
        let response = self.client.post(&self.photos_url).multipart(form).send().await?;

        let status = response.status();
        let body = response.text().await?;
        let payload = serde_json::from_str(&body).unwrap_or(serde_json::Value::String(body));

        Ok(PostResult {
            status: status.as_u16(),
            success: status.is_success(),
            payload,
        })
    }
}

/// 以 URL 最後一段當檔名，取不到就用 image.png
fn file_name(image: &ImageReference) -> String {
    url::Url::parse(&image.url)
        .ok()
        .and_then(|u| {
            u.path_segments()
                .and_then(|mut segments| segments.next_back().map(str::to_string))
        })
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "image.png".to_string())
}

#[async_trait]
impl Publisher for FacebookPublisher {
    async fn publish(&self, image: &ImageReference, caption: &Prompt) -> Result<PostResult> {
        let data = self.download(image).await?;
        let post = self.upload(image, data, caption).await?;

        if post.success {
            tracing::info!("📤 Facebook response: {}", post.payload);
        } else {
            tracing::warn!(
                "⚠️ Facebook rejected the post (status {}): {}",
                post.status,
                post.payload
            );
        }
        Ok(post)
    }
}
