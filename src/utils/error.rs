use crate::core::gate::GateRejection;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Request rejected: {0}")]
    Gate(#[from] GateRejection),

    #[error("Mail transport request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfig { field: String },

    #[error("Invalid configuration value for {field} ({value}): {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// 錯誤分類，對應處理流程的四種錯誤類型（加上啟動時的配置錯誤）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// 呼叫端錯誤：方法不符、內容無法解析、缺少必填欄位
    Client,
    /// 機器人訊號：不會以錯誤形式回應給呼叫端
    Abuse,
    /// 郵件傳輸服務拒絕或無法連線
    Transport,
    Internal,
    Configuration,
}

impl RelayError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            RelayError::Gate(_) => ErrorCategory::Client,
            RelayError::Http(_) => ErrorCategory::Transport,
            RelayError::Config { .. }
            | RelayError::MissingConfig { .. }
            | RelayError::InvalidConfigValue { .. } => ErrorCategory::Configuration,
            RelayError::Io(_) | RelayError::Serialization(_) | RelayError::Internal { .. } => {
                ErrorCategory::Internal
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            RelayError::Gate(rejection) => rejection.to_string(),
            RelayError::Http(_) => "Failed to send notification".to_string(),
            RelayError::Config { message } => format!("Configuration problem: {}", message),
            RelayError::MissingConfig { field } => {
                format!("Required setting '{}' is not configured", field)
            }
            RelayError::InvalidConfigValue { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            RelayError::Io(e) => format!("Could not read input: {}", e),
            RelayError::Serialization(_) | RelayError::Internal { .. } => {
                "Internal Server Error".to_string()
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Client => "Check the request method and the JSON body fields",
            ErrorCategory::Abuse => "No action required",
            ErrorCategory::Transport => {
                "Check the mail transport endpoint and credentials, then resubmit"
            }
            ErrorCategory::Configuration => {
                "Check the configuration file and RELAY_* environment variables"
            }
            ErrorCategory::Internal => "Inspect the server logs for details",
        }
    }
}

pub type Result<T> = std::result::Result<T, RelayError>;
