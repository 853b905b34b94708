use anyhow::Result;
use async_trait::async_trait;
use happy_poster::core::{ImageReference, JobOutcome, PostResult, Prompt, Publisher};
use happy_poster::{
    build_job, BotConfig, Credentials, GeminiPromptGenerator, ImageApiGenerator, JobRunner,
    Settings,
};
use httpmock::prelude::*;
use serde_json::json;
use std::sync::{Arc, Mutex};

fn config_for(server: &MockServer) -> BotConfig {
    let mut settings = Settings::default();
    settings.endpoints.text_endpoint = server.url("/v1beta/models/gemini:generateContent");
    settings.endpoints.image_endpoint = server.url("/v1/generate");
    settings.endpoints.graph_base_url = server.base_url();
    settings.http.timeout_seconds = 5;

    BotConfig::new(
        Credentials::new("g-key", "i-key", "fb-token", "page-1"),
        settings,
    )
}

/// Records every publish call instead of talking to Facebook.
#[derive(Clone, Default)]
struct RecordingPublisher {
    calls: Arc<Mutex<Vec<(String, String)>>>,
}

#[async_trait]
impl Publisher for RecordingPublisher {
    async fn publish(
        &self,
        image: &ImageReference,
        caption: &Prompt,
    ) -> happy_poster::Result<PostResult> {
        self.calls
            .lock()
            .unwrap()
            .push((image.url.clone(), caption.text().to_string()));
        Ok(PostResult {
            status: 200,
            success: true,
            payload: json!({"id": "123"}),
        })
    }
}

#[tokio::test]
async fn test_prompt_and_image_reach_publisher() -> Result<()> {
    let server = MockServer::start();
    let text_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1beta/models/gemini:generateContent")
            .header("x-goog-api-key", "g-key");
        then.status(200)
            .json_body(json!({"candidates": [{"content": "Rise and shine!"}]}));
    });
    let image_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/generate")
            .header("authorization", "Bearer i-key")
            .json_body(json!({"prompt": "Rise and shine!", "size": "1024x1024"}));
        then.status(200).json_body(json!({"url": "http://img/1.png"}));
    });

    let config = config_for(&server);
    let client = reqwest::Client::new();
    let publisher = RecordingPublisher::default();
    let runner = JobRunner::new(
        GeminiPromptGenerator::new(client.clone(), &config),
        ImageApiGenerator::new(client, &config),
        publisher.clone(),
    );

    let report = runner.run_job().await;

    text_mock.assert();
    image_mock.assert();
    assert!(report.outcome.is_published());
    assert_eq!(
        *publisher.calls.lock().unwrap(),
        vec![("http://img/1.png".to_string(), "Rise and shine!".to_string())]
    );
    Ok(())
}

#[tokio::test]
async fn test_end_to_end_post_with_real_http() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1beta/models/gemini:generateContent");
        then.status(200)
            .json_body(json!({"candidates": [{"content": "Rise and shine!"}]}));
    });
    let image_url = server.url("/img/1.png");
    server.mock(|when, then| {
        when.method(POST).path("/v1/generate");
        then.status(200).json_body(json!({"url": image_url}));
    });
    let download_mock = server.mock(|when, then| {
        when.method(GET).path("/img/1.png");
        then.status(200)
            .header("Content-Type", "image/png")
            .body("fake-png-bytes");
    });
    let publish_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v17.0/page-1/photos")
            .body_contains("Rise and shine!")
            .body_contains("fb-token")
            .body_contains("fake-png-bytes");
        then.status(200).json_body(json!({"id": "123"}));
    });

    let job = build_job(&config_for(&server))?;
    let report = job.run_job().await;

    download_mock.assert();
    publish_mock.assert_hits(1);
    match report.outcome {
        JobOutcome::Published { image, post } => {
            assert_eq!(image.url, server.url("/img/1.png"));
            assert_eq!(post.post_id(), Some("123"));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(report.prompt.text(), "Rise and shine!");
    Ok(())
}

#[tokio::test]
async fn test_image_failure_skips_publish() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1beta/models/gemini:generateContent");
        then.status(200)
            .json_body(json!({"candidates": [{"content": "Rise and shine!"}]}));
    });
    let image_mock = server.mock(|when, then| {
        when.method(POST).path("/v1/generate");
        then.status(500).body("model overloaded");
    });
    let publish_mock = server.mock(|when, then| {
        when.method(POST).path("/v17.0/page-1/photos");
        then.status(200).json_body(json!({"id": "123"}));
    });

    let job = build_job(&config_for(&server))?;
    let report = job.run_job().await;

    image_mock.assert();
    publish_mock.assert_hits(0);
    assert!(report.outcome.is_skipped());
    Ok(())
}

#[tokio::test]
async fn test_text_failure_posts_fallback_caption() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1beta/models/gemini:generateContent");
        then.status(403).json_body(json!({"error": {"message": "API key not valid"}}));
    });
    let image_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/generate")
            .json_body(json!({"prompt": "Good Morning! Have a great day!", "size": "1024x1024"}));
        then.status(200)
            .json_body(json!({"url": "http://img/1.png"}));
    });

    let config = config_for(&server);
    let publisher = RecordingPublisher::default();
    let runner = JobRunner::new(
        GeminiPromptGenerator::new(reqwest::Client::new(), &config),
        ImageApiGenerator::new(reqwest::Client::new(), &config),
        publisher.clone(),
    );

    let report = runner.run_job().await;

    image_mock.assert();
    assert!(report.prompt.is_fallback());
    assert_eq!(
        publisher.calls.lock().unwrap()[0].1,
        "Good Morning! Have a great day!"
    );
    Ok(())
}

#[tokio::test]
async fn test_publish_failure_does_not_escape_run() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1beta/models/gemini:generateContent");
        then.status(200)
            .json_body(json!({"candidates": [{"content": "Good Night!"}]}));
    });
    server.mock(|when, then| {
        when.method(POST).path("/v1/generate");
        then.status(200).json_body(json!({"url": "http://127.0.0.1:1/img/1.png"}));
    });
    let publish_mock = server.mock(|when, then| {
        when.method(POST).path("/v17.0/page-1/photos");
        then.status(200).json_body(json!({"id": "123"}));
    });

    let job = build_job(&config_for(&server))?;
    let report = job.run_job().await;

    publish_mock.assert_hits(0);
    assert!(matches!(report.outcome, JobOutcome::PublishFailed { .. }));
    Ok(())
}

#[tokio::test]
async fn test_unreachable_graph_api_after_download_does_not_escape_run() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1beta/models/gemini:generateContent");
        then.status(200)
            .json_body(json!({"candidates": [{"content": "Good Night!"}]}));
    });
    let image_url = server.url("/img/1.png");
    server.mock(|when, then| {
        when.method(POST).path("/v1/generate");
        then.status(200).json_body(json!({"url": image_url}));
    });
    let download_mock = server.mock(|when, then| {
        when.method(GET).path("/img/1.png");
        then.status(200)
            .header("Content-Type", "image/png")
            .body("fake-png-bytes");
    });

    let mut config = config_for(&server);
    config.settings.endpoints.graph_base_url = "http://127.0.0.1:1".to_string();
    let job = build_job(&config)?;
    let report = job.run_job().await;

    download_mock.assert();
    match report.outcome {
        JobOutcome::PublishFailed { image, reason } => {
            assert_eq!(image.url, server.url("/img/1.png"));
            assert!(matches!(reason, happy_poster::BotError::HttpError(_)));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    Ok(())
}
