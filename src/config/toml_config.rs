use crate::utils::error::{BotError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_TEXT_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent";
pub const DEFAULT_IMAGE_ENDPOINT: &str = "https://api.your-image-generator.com/v1/generate";
pub const DEFAULT_GRAPH_BASE_URL: &str = "https://graph.facebook.com";
/// 最長一週一次
pub const MAX_INTERVAL_MINUTES: u64 = 7 * 24 * 60;

pub const DEFAULT_INSTRUCTION: &str = "Generate a unique, ultra-cute Good Morning or Good Night image prompt \
with detailed background, objects, 3D text, and integrate watermark 'Happy Happy' naturally. \
Include variations in color, style, wishes, sometimes date or day. \
Make each prompt completely unique and imaginative.";

/// 所有設定都有預設值，TOML 檔只需覆寫需要的欄位
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub endpoints: EndpointConfig,
    pub schedule: ScheduleConfig,
    pub prompt: PromptConfig,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub text_endpoint: String,
    pub image_endpoint: String,
    pub graph_base_url: String,
    pub graph_api_version: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            text_endpoint: DEFAULT_TEXT_ENDPOINT.to_string(),
            image_endpoint: DEFAULT_IMAGE_ENDPOINT.to_string(),
            graph_base_url: DEFAULT_GRAPH_BASE_URL.to_string(),
            graph_api_version: "v17.0".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub interval_minutes: u64,
    pub poll_seconds: u64,
    pub run_immediately: bool,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval_minutes: 30,
            poll_seconds: 10,
            run_immediately: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    pub instruction: String,
    pub fallback: String,
    pub image_size: String,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            instruction: DEFAULT_INSTRUCTION.to_string(),
            fallback: crate::domain::model::FALLBACK_PROMPT.to_string(),
            image_size: "1024x1024".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// 0 停用逾時
    pub timeout_seconds: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 120,
        }
    }
}

impl Settings {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(BotError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| BotError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${IMAGE_ENDPOINT})，未設定的變數保留原文
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| BotError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.schedule.interval_minutes.saturating_mul(60))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.schedule.poll_seconds)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        match self.http.timeout_seconds {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("endpoints.text_endpoint", &self.endpoints.text_endpoint)?;
        validation::validate_url("endpoints.image_endpoint", &self.endpoints.image_endpoint)?;
        validation::validate_url("endpoints.graph_base_url", &self.endpoints.graph_base_url)?;
        validation::validate_non_empty_string(
            "endpoints.graph_api_version",
            &self.endpoints.graph_api_version,
        )?;

        validation::validate_positive_number(
            "schedule.interval_minutes",
            self.schedule.interval_minutes,
            1,
        )?;
        if self.schedule.interval_minutes > MAX_INTERVAL_MINUTES {
            return Err(BotError::InvalidConfigValueError {
                field: "schedule.interval_minutes".to_string(),
                value: self.schedule.interval_minutes.to_string(),
                reason: format!("Interval must not exceed {} minutes", MAX_INTERVAL_MINUTES),
            });
        }
        validation::validate_positive_number("schedule.poll_seconds", self.schedule.poll_seconds, 1)?;

        if self.schedule.poll_seconds > self.interval().as_secs() {
            return Err(BotError::ConfigValidationError {
                field: "schedule.poll_seconds".to_string(),
                message: "Poll interval must not exceed the job interval".to_string(),
            });
        }

        validation::validate_non_empty_string("prompt.instruction", &self.prompt.instruction)?;
        validation::validate_non_empty_string("prompt.fallback", &self.prompt.fallback)?;
        validation::validate_image_size("prompt.image_size", &self.prompt.image_size)?;

        Ok(())
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
