#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use toml_config::{EndpointConfig, HttpConfig, PromptConfig, ScheduleConfig, Settings};

use crate::utils::error::{BotError, Result};
use crate::utils::validation::Validate;
use std::fmt;
use std::path::Path;

pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
pub const IMAGE_API_KEY: &str = "IMAGE_API_KEY";
pub const FB_PAGE_TOKEN: &str = "FB_PAGE_TOKEN";
pub const FB_PAGE_ID: &str = "FB_PAGE_ID";

/// 四個外部服務憑證，啟動時載入一次，之後唯讀
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub text_api_key: String,
    pub image_api_key: String,
    pub page_access_token: String,
    pub page_id: String,
}

impl Credentials {
    pub fn new(
        text_api_key: impl Into<String>,
        image_api_key: impl Into<String>,
        page_access_token: impl Into<String>,
        page_id: impl Into<String>,
    ) -> Self {
        Self {
            text_api_key: text_api_key.into(),
            image_api_key: image_api_key.into(),
            page_access_token: page_access_token.into(),
            page_id: page_id.into(),
        }
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Values are opaque; only presence is checked.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name).ok_or_else(|| BotError::MissingConfigError {
                field: name.to_string(),
            })
        };

        Ok(Self {
            text_api_key: required(GEMINI_API_KEY)?,
            image_api_key: required(IMAGE_API_KEY)?,
            page_access_token: required(FB_PAGE_TOKEN)?,
            page_id: required(FB_PAGE_ID)?,
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("text_api_key", &"<redacted>")
            .field("image_api_key", &"<redacted>")
            .field("page_access_token", &"<redacted>")
            .field("page_id", &self.page_id)
            .finish()
    }
}

/// Immutable process configuration handed to every component at construction.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub credentials: Credentials,
    pub settings: Settings,
}

impl BotConfig {
    pub fn new(credentials: Credentials, settings: Settings) -> Self {
        Self {
            credentials,
            settings,
        }
    }

    /// Loads settings from `path` (or defaults) and credentials from the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let settings = match path {
            Some(path) => Settings::from_file(path)?,
            None => Settings::default(),
        };
        Ok(Self::new(Credentials::from_env()?, settings))
    }

    /// `{graph_base_url}/{graph_api_version}/{page_id}/photos`
    pub fn photos_url(&self) -> String {
        format!(
            "{}/{}/{}/photos",
            self.settings.endpoints.graph_base_url.trim_end_matches('/'),
            self.settings.endpoints.graph_api_version,
            self.credentials.page_id
        )
    }
}

impl Validate for BotConfig {
    fn validate(&self) -> Result<()> {
        self.settings.validate()
    }
}
