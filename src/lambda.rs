#[cfg(feature = "lambda")]
use access_relay::utils::{logger, validation::Validate};
#[cfg(feature = "lambda")]
use access_relay::{
    HandlerResponse, InboundRequest, MailChannelsDispatcher, RegistrationHandler, RelayConfig,
};
#[cfg(feature = "lambda")]
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
#[cfg(feature = "lambda")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "lambda")]
use std::collections::HashMap;
#[cfg(feature = "lambda")]
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// API Gateway proxy event (REST `httpMethod` or HTTP API `requestContext.http.method`)
#[cfg(feature = "lambda")]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    #[serde(alias = "method")]
    pub http_method: Option<String>,
    pub request_context: Option<RequestContext>,
    pub body: Option<String>,
}

#[cfg(feature = "lambda")]
#[derive(Debug, Deserialize)]
pub struct RequestContext {
    pub http: Option<HttpContext>,
}

#[cfg(feature = "lambda")]
#[derive(Debug, Deserialize)]
pub struct HttpContext {
    pub method: String,
}

#[cfg(feature = "lambda")]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
}

#[cfg(feature = "lambda")]
impl Request {
    fn into_inbound(self) -> InboundRequest {
        let method = self
            .http_method
            .or_else(|| self.request_context.and_then(|ctx| ctx.http).map(|http| http.method))
            .unwrap_or_default();
        InboundRequest::new(method, self.body.unwrap_or_default())
    }
}

#[cfg(feature = "lambda")]
impl From<HandlerResponse> for Response {
    fn from(response: HandlerResponse) -> Self {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), response.content_type.to_string());
        Self {
            status_code: response.status,
            headers,
            body: response.body,
        }
    }
}

// 保留一點時間讓逾時回應能送回
#[cfg(feature = "lambda")]
const DEADLINE_MARGIN: Duration = Duration::from_millis(250);

#[cfg(feature = "lambda")]
fn remaining_time(deadline_ms: u64) -> Duration {
    let now_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    Duration::from_millis(deadline_ms.saturating_sub(now_ms)).saturating_sub(DEADLINE_MARGIN)
}

#[cfg(feature = "lambda")]
async fn function_handler(
    handler: &RegistrationHandler<MailChannelsDispatcher>,
    event: LambdaEvent<Request>,
) -> Result<Response, Error> {
    tracing::debug!("Handling registration request {}", event.context.request_id);

    let limit = remaining_time(event.context.deadline);
    let response = handler
        .handle_within(event.payload.into_inbound(), limit)
        .await;

    tracing::info!("Registration request finished with status {}", response.status);
    Ok(response.into())
}

#[cfg(feature = "lambda")]
#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    // 冷啟動時建立一次，之後每次呼叫共用
    let config = RelayConfig::from_env()?;
    config.validate()?;
    let handler = RegistrationHandler::new(MailChannelsDispatcher::from_config(&config)?);
    let handler = &handler;

    run(service_fn(move |event: LambdaEvent<Request>| async move {
        function_handler(handler, event).await
    }))
    .await
}

#[cfg(all(test, feature = "lambda"))]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rest_api_event_conversion() {
        let request: Request = serde_json::from_value(json!({
            "httpMethod": "POST",
            "body": "{\"email\":\"a@b.com\"}"
        }))
        .unwrap();

        let inbound = request.into_inbound();
        assert_eq!(inbound.method, "POST");
        assert_eq!(inbound.body, b"{\"email\":\"a@b.com\"}".to_vec());
    }

    #[test]
    fn test_http_api_event_conversion() {
        let request: Request = serde_json::from_value(json!({
            "requestContext": { "http": { "method": "GET" } }
        }))
        .unwrap();

        let inbound = request.into_inbound();
        assert_eq!(inbound.method, "GET");
        assert!(inbound.body.is_empty());
    }

    #[test]
    fn test_response_conversion() {
        let response: Response = HandlerResponse::text(405, "Method Not Allowed").into();
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["statusCode"], 405);
        assert_eq!(value["headers"]["Content-Type"], HandlerResponse::TEXT_PLAIN);
        assert_eq!(value["body"], "Method Not Allowed");
    }

    #[test]
    fn test_remaining_time_past_deadline_is_zero() {
        assert_eq!(remaining_time(0), Duration::ZERO);
    }
}
