use crate::domain::model::{JobOutcome, JobReport};
use crate::domain::ports::{ImageSource, PromptSource, Publisher, ScheduledJob};
use async_trait::async_trait;
use chrono::Local;

/// One end-to-end run: prompt → image → publish.
///
/// Failures never leave `run_job`; they end up in the returned [`JobReport`].
/// A failed image stage skips publishing.
pub struct JobRunner<P: PromptSource, I: ImageSource, U: Publisher> {
    prompts: P,
    images: I,
    publisher: U,
}

impl<P: PromptSource, I: ImageSource, U: Publisher> JobRunner<P, I, U> {
    pub fn new(prompts: P, images: I, publisher: U) -> Self {
        Self {
            prompts,
            images,
            publisher,
        }
    }

    pub async fn run_job(&self) -> JobReport {
        let started_at = Local::now();
        let run_id = format!("job_{}", started_at.format("%Y%m%d_%H%M%S"));
        tracing::info!("🚀 [{}] Starting automation job {}", started_at, run_id);

        // Step 1: prompt
        let prompt = self.prompts.generate_prompt().await;
        tracing::info!("📝 Generated prompt: {}", prompt);

        // Step 2: image
        let outcome = match self.images.generate_image(&prompt).await {
            Err(reason) => {
                tracing::warn!("⏭️ Skipping post due to image generation failure: {}", reason);
                JobOutcome::Skipped { reason }
            }
            // Step 3: publish
            Ok(image) => match self.publisher.publish(&image, &prompt).await {
                Ok(post) => JobOutcome::Published { image, post },
                Err(reason) => {
                    tracing::error!("❌ Facebook API error: {}", reason);
                    JobOutcome::PublishFailed { image, reason }
                }
            },
        };

        let finished_at = Local::now();
        match &outcome {
            JobOutcome::Published { .. } => {
                tracing::info!("✅ [{}] Post completed ({})", finished_at, run_id)
            }
            _ => tracing::info!("🏁 [{}] Job finished without a post ({})", finished_at, run_id),
        }

        JobReport {
            run_id,
            started_at,
            finished_at,
            prompt,
            outcome,
        }
    }
}

#[async_trait]
impl<P: PromptSource, I: ImageSource, U: Publisher> ScheduledJob for JobRunner<P, I, U> {
    async fn run_job(&self) -> JobReport {
        JobRunner::run_job(self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{ImageReference, PostResult, Prompt, FALLBACK_PROMPT};
    use crate::utils::error::{BotError, Result};
    use std::sync::{Arc, Mutex};

    struct FixedPrompt(Prompt);

    #[async_trait]
    impl PromptSource for FixedPrompt {
        async fn generate_prompt(&self) -> Prompt {
            self.0.clone()
        }
    }

    struct FixedImage(Option<&'static str>);

    #[async_trait]
    impl ImageSource for FixedImage {
        async fn generate_image(&self, _prompt: &Prompt) -> Result<ImageReference> {
            match self.0 {
                Some(url) => Ok(ImageReference::new(url)),
                None => Err(BotError::UpstreamStatus {
                    service: "image-api".to_string(),
                    status: 500,
                    body: String::new(),
                }),
            }
        }
    }

    #[derive(Clone, Default)]
    struct RecordingPublisher {
        calls: Arc<Mutex<Vec<(String, String)>>>,
        fail: bool,
    }

    #[async_trait]
    impl Publisher for RecordingPublisher {
        async fn publish(&self, image: &ImageReference, caption: &Prompt) -> Result<PostResult> {
            self.calls
                .lock()
                .unwrap()
                .push((image.url.clone(), caption.text().to_string()));
            if self.fail {
                return Err(BotError::IoError(std::io::Error::new(
                    std::io::ErrorKind::ConnectionReset,
                    "upload interrupted",
                )));
            }
            Ok(PostResult {
                status: 200,
                success: true,
                payload: serde_json::json!({"id": "123"}),
            })
        }
    }

    fn runner(
        image: Option<&'static str>,
        publisher: RecordingPublisher,
    ) -> JobRunner<FixedPrompt, FixedImage, RecordingPublisher> {
        JobRunner::new(
            FixedPrompt(Prompt::generated("Rise and shine!").unwrap()),
            FixedImage(image),
            publisher,
        )
    }

    #[tokio::test]
    async fn test_image_failure_skips_publish() {
        let publisher = RecordingPublisher::default();
        let report = runner(None, publisher.clone()).run_job().await;

        assert!(report.outcome.is_skipped());
        assert_eq!(publisher.calls.lock().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_publishes_once_with_prompt_as_caption() {
        let publisher = RecordingPublisher::default();
        let report = runner(Some("http://img/1.png"), publisher.clone())
            .run_job()
            .await;

        assert!(report.outcome.is_published());
        assert!(report.run_id.starts_with("job_"));
        assert!(report.finished_at >= report.started_at);
        assert_eq!(
            *publisher.calls.lock().unwrap(),
            vec![("http://img/1.png".to_string(), "Rise and shine!".to_string())]
        );
    }

    #[tokio::test]
    async fn test_publish_failure_does_not_escape() {
        let publisher = RecordingPublisher {
            fail: true,
            ..Default::default()
        };
        let report = runner(Some("http://img/1.png"), publisher.clone())
            .run_job()
            .await;

        match report.outcome {
            JobOutcome::PublishFailed { image, .. } => assert_eq!(image.url, "http://img/1.png"),
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(publisher.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_fallback_prompt_is_still_used_as_caption() {
        let publisher = RecordingPublisher::default();
        let runner = JobRunner::new(
            FixedPrompt(Prompt::fallback(FALLBACK_PROMPT, "gemini down")),
            FixedImage(Some("http://img/2.png")),
            publisher.clone(),
        );

        let report = runner.run_job().await;

        assert!(report.prompt.is_fallback());
        assert_eq!(publisher.calls.lock().unwrap()[0].1, FALLBACK_PROMPT);
    }
}
