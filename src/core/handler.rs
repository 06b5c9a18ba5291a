use crate::core::composer::compose;
use crate::core::gate::{admit, Admission};
use crate::domain::model::{
    DispatchOutcome, HandlerResponse, InboundRequest, RegistrationReceipt,
};
use crate::domain::ports::Dispatcher;
use crate::utils::error::{ErrorCategory, RelayError, Result};
use chrono::{DateTime, Utc};
use std::time::Duration;

/// 各階段的結果，尚未轉換成 HTTP 回應
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    SilentDrop,
    Dispatched(DispatchOutcome),
}

/// 單一端點的註冊申請處理器：Request Gate → Message Composer → Transport Dispatcher。
///
/// 呼叫之間不共享可變狀態，可同時處理多個請求。
pub struct RegistrationHandler<D: Dispatcher> {
    dispatcher: D,
}

impl<D: Dispatcher> RegistrationHandler<D> {
    pub fn new(dispatcher: D) -> Self {
        Self { dispatcher }
    }

    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    pub async fn handle(&self, request: InboundRequest) -> HandlerResponse {
        self.handle_at(request, Utc::now()).await
    }

    /// Same as [`handle`](Self::handle) with the received timestamp supplied by the caller.
    pub async fn handle_at(&self, request: InboundRequest, now: DateTime<Utc>) -> HandlerResponse {
        match self.process(request, now).await {
            Ok(outcome) => respond(outcome),
            Err(e) => respond_error(e),
        }
    }

    /// 託管環境有執行期限時使用：超時視為內部錯誤
    pub async fn handle_within(&self, request: InboundRequest, limit: Duration) -> HandlerResponse {
        match tokio::time::timeout(limit, self.handle(request)).await {
            Ok(response) => response,
            Err(_) => respond_error(RelayError::Internal {
                message: format!("invocation exceeded {:?}", limit),
            }),
        }
    }

    async fn process(&self, request: InboundRequest, now: DateTime<Utc>) -> Result<Outcome> {
        let payload = match admit(request)? {
            Admission::Accepted(payload) => payload,
            Admission::SilentDrop => return Ok(Outcome::SilentDrop),
        };

        let message = compose(&payload, now);
        tracing::info!("📨 Dispatching access request notification: {}", message.subject);

        Ok(Outcome::Dispatched(self.dispatcher.dispatch(&message).await))
    }
}

fn respond(outcome: Outcome) -> HandlerResponse {
    match outcome {
        Outcome::SilentDrop => HandlerResponse::text(200, "Success"),
        Outcome::Dispatched(DispatchOutcome::Delivered) => {
            match serde_json::to_string(&RegistrationReceipt::received()) {
                Ok(body) => {
                    tracing::info!("✅ Access request notification delivered");
                    HandlerResponse::json(200, body)
                }
                Err(e) => respond_error(RelayError::from(e)),
            }
        }
        Outcome::Dispatched(DispatchOutcome::Rejected(reason)) => {
            tracing::error!("❌ Notification rejected before sending: {}", reason);
            HandlerResponse::text(500, "Failed to send notification")
        }
        // 細節只寫入日誌，不回傳給呼叫端
        Outcome::Dispatched(DispatchOutcome::TransportFailure(_)) => {
            HandlerResponse::text(500, "Failed to send notification")
        }
    }
}

fn respond_error(error: RelayError) -> HandlerResponse {
    match error {
        RelayError::Gate(rejection) => HandlerResponse::text(rejection.status(), rejection.to_string()),
        other => {
            tracing::error!(
                "❌ Error processing registration: {} (Category: {:?})",
                other,
                other.category()
            );
            if other.category() == ErrorCategory::Transport {
                HandlerResponse::text(500, "Failed to send notification")
            } else {
                HandlerResponse::text(500, "Internal Server Error")
            }
        }
    }
}
