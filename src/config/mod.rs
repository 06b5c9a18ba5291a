#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::domain::model::Identity;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{RelayError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::env;

pub const DEFAULT_TRANSPORT_ENDPOINT: &str = "https://api.mailchannels.net/tx/v1/send";
pub const DEFAULT_SENDER_EMAIL: &str = "noreply@medaskca.com";
pub const DEFAULT_SENDER_NAME: &str = "MEDASKCA Registration Form";
pub const DEFAULT_RECIPIENT_EMAIL: &str = "registrations@medaskca.com";
pub const DEFAULT_RECIPIENT_NAME: &str = "MEDASKCA Registrations";
pub const DEFAULT_DKIM_DOMAIN: &str = "medaskca.com";
pub const DEFAULT_DKIM_SELECTOR: &str = "mailchannels";

/// 郵件傳輸設定，啟動時讀取一次，之後唯讀
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayConfig {
    pub transport_endpoint: String,
    pub api_key: Option<String>,
    pub sender: Identity,
    pub recipient: Identity,
    pub dkim_domain: Option<String>,
    pub dkim_selector: Option<String>,
    /// 不設定時不限制外送請求時間
    pub timeout_seconds: Option<u64>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            transport_endpoint: DEFAULT_TRANSPORT_ENDPOINT.to_string(),
            api_key: None,
            sender: Identity::new(DEFAULT_SENDER_EMAIL, DEFAULT_SENDER_NAME),
            recipient: Identity::new(DEFAULT_RECIPIENT_EMAIL, DEFAULT_RECIPIENT_NAME),
            dkim_domain: Some(DEFAULT_DKIM_DOMAIN.to_string()),
            dkim_selector: Some(DEFAULT_DKIM_SELECTOR.to_string()),
            timeout_seconds: None,
        }
    }
}

impl RelayConfig {
    /// Reads `RELAY_*` environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 以任意查詢函式取得設定值（方便測試，不需修改行程環境變數）
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        // DKIM 設為空字串即可關閉
        let optional = |key: &str, default: Option<String>| match lookup(key) {
            Some(value) if value.is_empty() => None,
            Some(value) => Some(value),
            None => default,
        };

        let timeout_seconds = match lookup("RELAY_TIMEOUT_SECONDS") {
            Some(raw) => Some(raw.parse::<u64>().map_err(|e| {
                RelayError::InvalidConfigValue {
                    field: "RELAY_TIMEOUT_SECONDS".to_string(),
                    value: raw.clone(),
                    reason: format!("Not a whole number of seconds: {}", e),
                }
            })?),
            None => None,
        };

        Ok(Self {
            transport_endpoint: lookup("RELAY_TRANSPORT_ENDPOINT")
                .unwrap_or(defaults.transport_endpoint),
            api_key: optional("RELAY_API_KEY", None),
            sender: Identity::new(
                lookup("RELAY_SENDER_EMAIL").unwrap_or(defaults.sender.email),
                lookup("RELAY_SENDER_NAME").unwrap_or(defaults.sender.name),
            ),
            recipient: Identity::new(
                lookup("RELAY_RECIPIENT_EMAIL").unwrap_or(defaults.recipient.email),
                lookup("RELAY_RECIPIENT_NAME").unwrap_or(defaults.recipient.name),
            ),
            dkim_domain: optional("RELAY_DKIM_DOMAIN", defaults.dkim_domain),
            dkim_selector: optional("RELAY_DKIM_SELECTOR", defaults.dkim_selector),
            timeout_seconds,
        })
    }
}

impl ConfigProvider for RelayConfig {
    fn transport_endpoint(&self) -> &str {
        &self.transport_endpoint
    }

    fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    fn sender(&self) -> &Identity {
        &self.sender
    }

    fn recipient(&self) -> &Identity {
        &self.recipient
    }

    fn dkim_domain(&self) -> Option<&str> {
        self.dkim_domain.as_deref()
    }

    fn dkim_selector(&self) -> Option<&str> {
        self.dkim_selector.as_deref()
    }

    fn timeout_seconds(&self) -> Option<u64> {
        self.timeout_seconds
    }
}

impl Validate for RelayConfig {
    fn validate(&self) -> Result<()> {
        validate_url("transport.endpoint", &self.transport_endpoint)?;

        validate_non_empty_string("sender.email", &self.sender.email)?;
        validate_non_empty_string("sender.name", &self.sender.name)?;
        validate_non_empty_string("recipient.email", &self.recipient.email)?;
        validate_non_empty_string("recipient.name", &self.recipient.name)?;

        if let Some(key) = &self.api_key {
            if key.contains("${") {
                return Err(RelayError::InvalidConfigValue {
                    field: "transport.api_key".to_string(),
                    value: key.clone(),
                    reason: "Unresolved environment variable placeholder".to_string(),
                });
            }
        }

        if self.dkim_domain.is_some() != self.dkim_selector.is_some() {
            return Err(RelayError::Config {
                message: "dkim.domain and dkim.selector must be set together".to_string(),
            });
        }

        if let Some(seconds) = self.timeout_seconds {
            validate_positive_number("transport.timeout_seconds", seconds, 1)?;
        }

        tracing::debug!("✅ Relay configuration validation passed");
        Ok(())
    }
}
