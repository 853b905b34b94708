use chrono::{DateTime, Local};
use std::fmt;

use crate::utils::error::BotError;

/// 文字服務失敗時使用的預設貼文內容
pub const FALLBACK_PROMPT: &str = "Good Morning! Have a great day!";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOrigin {
    Generated,
    Fallback { reason: String },
}

/// Image prompt that doubles as the post caption. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    text: String,
    origin: PromptOrigin,
}

impl Prompt {
    /// Returns `None` for blank text so a generated prompt can never be empty.
    pub fn generated(text: impl Into<String>) -> Option<Self> {
        let text = text.into().trim().to_string();
        if text.is_empty() {
            return None;
        }
        Some(Self {
            text,
            origin: PromptOrigin::Generated,
        })
    }

    /// Blank fallbacks are replaced by [`FALLBACK_PROMPT`].
    pub fn fallback(text: &str, reason: impl Into<String>) -> Self {
        let text = if text.trim().is_empty() {
            FALLBACK_PROMPT
        } else {
            text.trim()
        };
        Self {
            text: text.to_string(),
            origin: PromptOrigin::Fallback {
                reason: reason.into(),
            },
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn origin(&self) -> &PromptOrigin {
        &self.origin
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.origin, PromptOrigin::Fallback { .. })
    }
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    pub url: String,
}

impl ImageReference {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// Facebook 回應，只用於記錄
#[derive(Debug, Clone, PartialEq)]
pub struct PostResult {
    pub status: u16,
    pub success: bool,
    pub payload: serde_json::Value,
}

impl PostResult {
    pub fn post_id(&self) -> Option<&str> {
        self.payload.get("id").and_then(|v| v.as_str())
    }
}

#[derive(Debug)]
pub enum JobOutcome {
    Published {
        image: ImageReference,
        post: PostResult,
    },
    /// Image generation failed, publish stage not attempted.
    Skipped { reason: BotError },
    PublishFailed {
        image: ImageReference,
        reason: BotError,
    },
}

impl JobOutcome {
    pub fn is_published(&self) -> bool {
        matches!(self, JobOutcome::Published { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, JobOutcome::Skipped { .. })
    }
}

#[derive(Debug)]
pub struct JobReport {
    pub run_id: String,
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
    pub prompt: Prompt,
    pub outcome: JobOutcome,
}

impl JobReport {
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}
