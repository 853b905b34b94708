use crate::domain::model::{ImageReference, JobReport, PostResult, Prompt};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Text service. Infallible: failures degrade to a fallback prompt.
#[async_trait]
pub trait PromptSource: Send + Sync {
    async fn generate_prompt(&self) -> Prompt;
}

#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn generate_image(&self, prompt: &Prompt) -> Result<ImageReference>;
}

#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, image: &ImageReference, caption: &Prompt) -> Result<PostResult>;
}

/// 排程器執行的工作單位
#[async_trait]
pub trait ScheduledJob: Send + Sync {
    async fn run_job(&self) -> JobReport;
}
