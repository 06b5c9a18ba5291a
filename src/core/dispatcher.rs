use crate::domain::model::{DispatchOutcome, Identity, NotificationMessage};
use crate::domain::ports::{ConfigProvider, Dispatcher};
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

const API_KEY_HEADER: &str = "X-Api-Key";

// MailChannels /tx/v1/send 請求格式
#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    personalizations: Vec<Personalization<'a>>,
    from: &'a Identity,
    reply_to: &'a Identity,
    subject: &'a str,
    content: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Personalization<'a> {
    to: Vec<&'a Identity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dkim_domain: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dkim_selector: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(rename = "type")]
    content_type: &'a str,
    value: &'a str,
}

/// Transport Dispatcher backed by the MailChannels transactional API.
///
/// One POST per message, no retries. Any non-2xx status or network error
/// becomes [`DispatchOutcome::TransportFailure`].
#[derive(Debug, Clone)]
pub struct MailChannelsDispatcher {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    sender: Identity,
    recipient: Identity,
    dkim_domain: Option<String>,
    dkim_selector: Option<String>,
}

impl MailChannelsDispatcher {
    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(seconds) = config.timeout_seconds() {
            builder = builder.timeout(Duration::from_secs(seconds));
        }
        Ok(Self::with_client(builder.build()?, config))
    }

    pub fn with_client<C: ConfigProvider>(client: Client, config: &C) -> Self {
        Self {
            client,
            endpoint: config.transport_endpoint().to_string(),
            api_key: config.api_key().map(str::to_string),
            sender: config.sender().clone(),
            recipient: config.recipient().clone(),
            dkim_domain: config.dkim_domain().map(str::to_string),
            dkim_selector: config.dkim_selector().map(str::to_string),
        }
    }

    fn send_request<'a>(&'a self, message: &'a NotificationMessage) -> SendRequest<'a> {
        SendRequest {
            personalizations: vec![Personalization {
                to: vec![&self.recipient],
                dkim_domain: self.dkim_domain.as_deref(),
                dkim_selector: self.dkim_selector.as_deref(),
            }],
            from: &self.sender,
            reply_to: &message.reply_to,
            subject: &message.subject,
            content: vec![Content {
                content_type: "text/plain",
                value: &message.body_text,
            }],
        }
    }
}

#[async_trait]
impl Dispatcher for MailChannelsDispatcher {
    async fn dispatch(&self, message: &NotificationMessage) -> DispatchOutcome {
        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&self.send_request(message));
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        tracing::debug!("Sending notification to mail transport: {}", self.endpoint);
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) if e.is_builder() => {
                tracing::error!("❌ Could not build mail transport request: {}", e);
                return DispatchOutcome::Rejected(e.to_string());
            }
            Err(e) => {
                tracing::error!("❌ Mail transport unreachable: {}", e);
                return DispatchOutcome::TransportFailure(e.to_string());
            }
        };

        let status = response.status();
        tracing::debug!("Mail transport response status: {}", status);
        if status.is_success() {
            return DispatchOutcome::Delivered;
        }

        let detail = response
            .text()
            .await
            .unwrap_or_else(|e| format!("<unreadable body: {}>", e));
        tracing::error!("❌ Failed to send email: HTTP {}: {}", status, detail);
        DispatchOutcome::TransportFailure(format!("HTTP {}: {}", status, detail))
    }
}
