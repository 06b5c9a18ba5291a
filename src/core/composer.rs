use crate::domain::model::{Identity, NotificationMessage, SubmissionPayload};
use chrono::{DateTime, SecondsFormat, Utc};

pub const SUBJECT_PREFIX: &str = "New Access Request: ";

/// Message Composer：由申請內容與注入的時間產生主旨與純文字內文。
///
/// 不做 HTML 跳脫，內容只會以 `text/plain` 送出。
pub fn compose(payload: &SubmissionPayload, now: DateTime<Utc>) -> NotificationMessage {
    let display_name = display_name(payload);

    let referral_suffix = match payload.referral_other.as_deref() {
        Some(other) if !other.is_empty() => format!(" - {}", other),
        _ => String::new(),
    };

    let body_text = format!(
        "
New access request received:

Name: {name}
Email: {email}
Organisation: {organisation}
Role: {role}
Country: {country}
Intended Use: {intended_use}
Referral: {referral}{referral_suffix}

Additional Notes: {notes}

---
Received: {received}
    ",
        name = display_name,
        email = payload.email,
        organisation = payload.organisation,
        role = payload.role_or_default(),
        country = payload.country_or_default(),
        intended_use = payload.intended_use_or_default(),
        referral = payload.referral_or_default(),
        referral_suffix = referral_suffix,
        notes = payload.notes_or_default(),
        received = format_timestamp(now),
    )
    .trim()
    .to_string();

    NotificationMessage {
        subject: format!("{}{}", SUBJECT_PREFIX, display_name),
        body_text,
        reply_to: Identity::new(payload.email.clone(), reply_to_name(payload)),
    }
}

/// `name` 優先，其次為 `title first last`，最後為 `first last`
pub fn display_name(payload: &SubmissionPayload) -> String {
    if let Some(name) = &payload.name {
        return name.clone();
    }
    match &payload.title {
        Some(title) => format!("{} {} {}", title, payload.first_name, payload.last_name)
            .trim()
            .to_string(),
        None => format!("{} {}", payload.first_name, payload.last_name),
    }
}

// 回覆對象的名稱不含頭銜
fn reply_to_name(payload: &SubmissionPayload) -> String {
    payload
        .name
        .clone()
        .unwrap_or_else(|| format!("{} {}", payload.first_name, payload.last_name))
}

/// ISO-8601 UTC, millisecond precision, `Z` suffix.
pub fn format_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}
