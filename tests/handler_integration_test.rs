use access_relay::domain::model::RegistrationReceipt;
use access_relay::{
    HandlerResponse, InboundRequest, MailChannelsDispatcher, RegistrationHandler, RelayConfig,
};
use anyhow::Result;
use httpmock::prelude::*;
use serde_json::json;
use std::sync::Arc;

fn handler_for(server: &MockServer) -> Result<RegistrationHandler<MailChannelsDispatcher>> {
    let config = RelayConfig {
        transport_endpoint: server.url("/tx/v1/send"),
        ..RelayConfig::default()
    };
    Ok(RegistrationHandler::new(MailChannelsDispatcher::from_config(
        &config,
    )?))
}

fn valid_body() -> serde_json::Value {
    json!({
        "email": "a@b.com",
        "first_name": "A",
        "last_name": "B",
        "organisation": "Org"
    })
}

#[tokio::test]
async fn test_end_to_end_delivered() -> Result<()> {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/tx/v1/send")
            .json_body_partial(r#"{ "reply_to": { "email": "a@b.com", "name": "A B" } }"#)
            .json_body_partial(r#"{ "subject": "New Access Request: A B" }"#);
        then.status(200);
    });

    let handler = handler_for(&server)?;
    let response = handler
        .handle(InboundRequest::post(valid_body().to_string()))
        .await;

    api_mock.assert_hits(1);
    assert_eq!(response.status, 200);
    assert_eq!(response.content_type, HandlerResponse::APPLICATION_JSON);
    let receipt: RegistrationReceipt = serde_json::from_str(&response.body)?;
    assert!(receipt.success);
    assert_eq!(receipt.message, "Registration received");
    Ok(())
}

#[tokio::test]
async fn test_end_to_end_transport_unavailable() -> Result<()> {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST).path("/tx/v1/send");
        then.status(503).body("mail relay maintenance window");
    });

    let handler = handler_for(&server)?;
    let response = handler
        .handle(InboundRequest::post(valid_body().to_string()))
        .await;

    api_mock.assert_hits(1);
    assert_eq!(response.status, 500);
    assert_eq!(response.content_type, HandlerResponse::TEXT_PLAIN);
    assert!(!response.body.contains("maintenance"));
    Ok(())
}

#[tokio::test]
async fn test_non_post_methods_never_reach_transport() -> Result<()> {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.path("/tx/v1/send");
        then.status(200);
    });

    let handler = handler_for(&server)?;
    for method in ["GET", "PUT", "PATCH", "DELETE", "HEAD"] {
        for body in [valid_body().to_string(), "garbage".to_string(), String::new()] {
            let response = handler.handle(InboundRequest::new(method, body)).await;
            assert_eq!(response.status, 405);
        }
    }

    api_mock.assert_hits(0);
    Ok(())
}

#[tokio::test]
async fn test_missing_required_field_returns_400() -> Result<()> {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.path("/tx/v1/send");
        then.status(200);
    });

    let handler = handler_for(&server)?;
    for field in ["email", "first_name", "last_name", "organisation"] {
        let mut body = valid_body();
        if let Some(fields) = body.as_object_mut() {
            fields.remove(field);
        }

        let response = handler.handle(InboundRequest::post(body.to_string())).await;
        assert_eq!(response.status, 400, "missing {}", field);
    }

    api_mock.assert_hits(0);
    Ok(())
}

#[tokio::test]
async fn test_honeypot_reports_success_without_outbound_call() -> Result<()> {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.path("/tx/v1/send");
        then.status(200);
    });

    let handler = handler_for(&server)?;
    let mut body = valid_body();
    body["website"] = json!("https://cheap-pills.example");

    let response = handler.handle(InboundRequest::post(body.to_string())).await;

    assert_eq!(response.status, 200);
    assert_eq!(response.body, "Success");
    assert_eq!(response.content_type, HandlerResponse::TEXT_PLAIN);
    api_mock.assert_hits(0);
    Ok(())
}

#[tokio::test]
async fn test_full_submission_body_is_relayed_as_plain_text() -> Result<()> {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/tx/v1/send")
            .body_contains("Name: Dr Ada Lovelace")
            .body_contains("Referral: Other - Meetup")
            .body_contains("Additional Notes: <script>alert(1)</script>")
            .json_body_partial(r#"{ "content": [{ "type": "text/plain" }] }"#);
        then.status(202);
    });

    let handler = handler_for(&server)?;
    let body = json!({
        "email": "ada@example.com",
        "first_name": "Ada",
        "last_name": "Lovelace",
        "organisation": "Analytical Engines",
        "title": "Dr",
        "referral": "Other",
        "referral_other": "Meetup",
        "notes": "<script>alert(1)</script>",
        "website": ""
    });

    let response = handler.handle(InboundRequest::post(body.to_string())).await;

    api_mock.assert();
    assert!(response.is_success());
    Ok(())
}

#[tokio::test]
async fn test_concurrent_submissions_are_independent() -> Result<()> {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST).path("/tx/v1/send");
        then.status(200);
    });

    let handler = Arc::new(handler_for(&server)?);
    let tasks: Vec<_> = (0..5)
        .map(|i| {
            let handler = Arc::clone(&handler);
            tokio::spawn(async move {
                let mut body = valid_body();
                body["email"] = json!(format!("user{}@example.com", i));
                handler.handle(InboundRequest::post(body.to_string())).await
            })
        })
        .collect();

    for task in tasks {
        assert_eq!(task.await?.status, 200);
    }
    api_mock.assert_hits(5);
    Ok(())
}
