use crate::domain::model::{InboundRequest, SubmissionPayload};
use crate::utils::validation::truthy_text;
use serde_json::{Map, Value};
use thiserror::Error;

pub const WRITE_METHOD: &str = "POST";

const REQUIRED_FIELDS: [&str; 4] = ["email", "first_name", "last_name", "organisation"];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GateRejection {
    #[error("Method Not Allowed")]
    MethodNotAllowed,

    #[error("Invalid request body")]
    MalformedBody,

    /// 不列出是哪個欄位缺少
    #[error("Missing required fields")]
    MissingFields,
}

impl GateRejection {
    pub fn status(&self) -> u16 {
        match self {
            GateRejection::MethodNotAllowed => 405,
            GateRejection::MalformedBody | GateRejection::MissingFields => 400,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    Accepted(SubmissionPayload),
    /// honeypot 欄位有值：回報成功但不寄信
    SilentDrop,
}

/// Request Gate：方法檢查、解析 body、必填欄位檢查、honeypot 過濾。
pub fn admit(request: InboundRequest) -> Result<Admission, GateRejection> {
    // 先檢查方法，不讀取 body
    if request.method != WRITE_METHOD {
        tracing::warn!("Rejected request with method {}", request.method);
        return Err(GateRejection::MethodNotAllowed);
    }

    let fields = parse_record(&request.body)?;
    let payload = extract_payload(&fields)?;

    if payload.is_automated() {
        tracing::info!("🍯 Honeypot field filled, dropping submission silently");
        return Ok(Admission::SilentDrop);
    }

    Ok(Admission::Accepted(payload))
}

fn parse_record(body: &[u8]) -> Result<Map<String, Value>, GateRejection> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(_) => {
            tracing::warn!("Rejected request body: JSON is not an object");
            Err(GateRejection::MalformedBody)
        }
        Err(e) => {
            tracing::warn!("Rejected request body: {}", e);
            Err(GateRejection::MalformedBody)
        }
    }
}

fn extract_payload(fields: &Map<String, Value>) -> Result<SubmissionPayload, GateRejection> {
    let text = |key: &str| truthy_text(fields.get(key));

    let [email, first_name, last_name, organisation] = REQUIRED_FIELDS.map(text);
    let (Some(email), Some(first_name), Some(last_name), Some(organisation)) =
        (email, first_name, last_name, organisation)
    else {
        tracing::warn!("Rejected submission with missing required fields");
        return Err(GateRejection::MissingFields);
    };

    Ok(SubmissionPayload {
        email,
        first_name,
        last_name,
        organisation,
        name: text("name"),
        title: text("title"),
        role: text("role"),
        country: text("country"),
        intended_use: text("intended_use"),
        referral: text("referral"),
        referral_other: text("referral_other"),
        notes: text("notes"),
        website: text("website"),
    })
}
