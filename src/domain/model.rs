use serde::{Deserialize, Serialize};

/// 選填欄位未填時的預設文字
pub const NOT_SPECIFIED: &str = "Not specified";
pub const NO_NOTES: &str = "None";

/// 一次註冊申請的內容，解析後即為唯讀。
///
/// 必填欄位為一般字串，選填欄位為 `Option<String>`；
/// 預設文字透過 `*_or_default` 方法取得。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub organisation: String,
    pub name: Option<String>,
    pub title: Option<String>,
    pub role: Option<String>,
    pub country: Option<String>,
    pub intended_use: Option<String>,
    pub referral: Option<String>,
    pub referral_other: Option<String>,
    pub notes: Option<String>,
    /// Honeypot
    pub website: Option<String>,
}

impl SubmissionPayload {
    pub fn role_or_default(&self) -> &str {
        self.role.as_deref().unwrap_or(NOT_SPECIFIED)
    }

    pub fn country_or_default(&self) -> &str {
        self.country.as_deref().unwrap_or(NOT_SPECIFIED)
    }

    pub fn intended_use_or_default(&self) -> &str {
        self.intended_use.as_deref().unwrap_or(NOT_SPECIFIED)
    }

    pub fn referral_or_default(&self) -> &str {
        self.referral.as_deref().unwrap_or(NOT_SPECIFIED)
    }

    pub fn notes_or_default(&self) -> &str {
        self.notes.as_deref().unwrap_or(NO_NOTES)
    }

    pub fn is_automated(&self) -> bool {
        self.website.is_some()
    }
}

/// An email address with a display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub email: String,
    pub name: String,
}

impl Identity {
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    pub subject: String,
    pub body_text: String,
    pub reply_to: Identity,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Delivered,
    /// The outbound request could not be built, so nothing was sent.
    Rejected(String),
    /// Non-2xx response or network failure. The detail is for logs only.
    TransportFailure(String),
}

impl DispatchOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, DispatchOutcome::Delivered)
    }
}

/// 由託管環境傳入的請求：HTTP 方法與原始 body
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: String,
    pub body: Vec<u8>,
}

impl InboundRequest {
    pub fn new(method: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            method: method.into(),
            body: body.into(),
        }
    }

    pub fn post(body: impl Into<Vec<u8>>) -> Self {
        Self::new("POST", body)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl HandlerResponse {
    pub const TEXT_PLAIN: &'static str = "text/plain;charset=UTF-8";
    pub const APPLICATION_JSON: &'static str = "application/json";

    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: Self::TEXT_PLAIN,
            body: body.into(),
        }
    }

    pub fn json(status: u16, body: String) -> Self {
        Self {
            status,
            content_type: Self::APPLICATION_JSON,
            body,
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// 成功送出後回傳給呼叫端的 JSON
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegistrationReceipt {
    pub success: bool,
    pub message: String,
}

impl RegistrationReceipt {
    pub fn received() -> Self {
        Self {
            success: true,
            message: "Registration received".to_string(),
        }
    }
}
