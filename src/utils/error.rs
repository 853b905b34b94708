use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("{service} responded with status {status}: {body}")]
    UpstreamStatus {
        service: String,
        status: u16,
        body: String,
    },

    #[error("Malformed {service} response: {details}")]
    MalformedResponse { service: String, details: String },
}

impl BotError {
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            BotError::ConfigError { .. }
                | BotError::MissingConfigError { .. }
                | BotError::InvalidConfigValueError { .. }
                | BotError::ConfigValidationError { .. }
        )
    }

    /// 給終端使用者看的錯誤訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            BotError::MissingConfigError { field } => {
                format!("Required setting '{}' is not set", field)
            }
            BotError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            BotError::ConfigValidationError { field, message } => {
                format!("Configuration '{}' is invalid: {}", field, message)
            }
            BotError::ConfigError { message } => format!("Configuration problem: {}", message),
            BotError::IoError(e) => format!("Could not read a file: {}", e),
            BotError::HttpError(_) | BotError::UpstreamStatus { .. } => {
                "A remote service could not be reached or refused the request".to_string()
            }
            BotError::SerializationError(_) | BotError::MalformedResponse { .. } => {
                "A remote service returned an unexpected response".to_string()
            }
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            BotError::MissingConfigError { field } => format!(
                "Export {} in the environment or add it to the .env file",
                field
            ),
            BotError::InvalidConfigValueError { field, .. }
            | BotError::ConfigValidationError { field, .. } => {
                format!("Fix '{}' in the config file or on the command line", field)
            }
            BotError::ConfigError { .. } | BotError::IoError(_) => {
                "Check that the config file exists and is valid TOML".to_string()
            }
            BotError::HttpError(_) | BotError::UpstreamStatus { .. } => {
                "Check network access and the API keys; the next scheduled run will try again"
                    .to_string()
            }
            BotError::SerializationError(_) | BotError::MalformedResponse { .. } => {
                "Check that the endpoint URLs point at the expected APIs".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, BotError>;
