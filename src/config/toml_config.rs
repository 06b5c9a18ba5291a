use crate::config::{
    RelayConfig, DEFAULT_DKIM_DOMAIN, DEFAULT_DKIM_SELECTOR, DEFAULT_RECIPIENT_EMAIL,
    DEFAULT_RECIPIENT_NAME, DEFAULT_SENDER_EMAIL, DEFAULT_SENDER_NAME,
    DEFAULT_TRANSPORT_ENDPOINT,
};
use crate::domain::model::Identity;
use crate::utils::error::{RelayError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub transport: TransportSection,
    pub sender: Option<IdentitySection>,
    pub recipient: Option<IdentitySection>,
    pub dkim: Option<DkimSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportSection {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    pub api_key: Option<String>,
    pub timeout_seconds: Option<u64>,
}

impl Default for TransportSection {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: None,
            timeout_seconds: None,
        }
    }
}

fn default_endpoint() -> String {
    DEFAULT_TRANSPORT_ENDPOINT.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentitySection {
    pub email: String,
    pub name: String,
}

/// `enabled = false` 時不送出 DKIM 提示
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DkimSection {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub domain: Option<String>,
    pub selector: Option<String>,
}

fn default_enabled() -> bool {
    true
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| RelayError::Config {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${MAILCHANNELS_API_KEY})，未設定的變數保留原文
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| RelayError::Internal {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn into_relay_config(self) -> RelayConfig {
        let identity = |section: Option<IdentitySection>, email: &str, name: &str| {
            section
                .map(|s| Identity::new(s.email, s.name))
                .unwrap_or_else(|| Identity::new(email, name))
        };

        let (dkim_domain, dkim_selector) = match self.dkim {
            Some(dkim) if !dkim.enabled => (None, None),
            Some(dkim) => (
                Some(dkim.domain.unwrap_or_else(|| DEFAULT_DKIM_DOMAIN.to_string())),
                Some(dkim.selector.unwrap_or_else(|| DEFAULT_DKIM_SELECTOR.to_string())),
            ),
            None => (
                Some(DEFAULT_DKIM_DOMAIN.to_string()),
                Some(DEFAULT_DKIM_SELECTOR.to_string()),
            ),
        };

        RelayConfig {
            transport_endpoint: self.transport.endpoint,
            api_key: self.transport.api_key,
            sender: identity(self.sender, DEFAULT_SENDER_EMAIL, DEFAULT_SENDER_NAME),
            recipient: identity(self.recipient, DEFAULT_RECIPIENT_EMAIL, DEFAULT_RECIPIENT_NAME),
            dkim_domain,
            dkim_selector,
            timeout_seconds: self.transport.timeout_seconds,
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.clone().into_relay_config().validate()
    }
}
