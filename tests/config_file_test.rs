use access_relay::utils::validation::Validate;
use access_relay::{InboundRequest, MailChannelsDispatcher, RegistrationHandler, TomlConfig};
use anyhow::Result;
use httpmock::prelude::*;
use serde_json::json;
use tempfile::TempDir;

/// TOML 設定檔中的寄件者、收件者、DKIM 與 API key 會完整帶到外送請求
#[tokio::test]
async fn test_toml_config_drives_outbound_request() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start();
    std::env::set_var("ACCESS_RELAY_IT_API_KEY", "it-key-42");

    let config_content = format!(
        r#"
[transport]
endpoint = "{}"
api_key = "${{ACCESS_RELAY_IT_API_KEY}}"
timeout_seconds = 5

[sender]
email = "forms@example.org"
name = "Example Forms"

[recipient]
email = "access@example.org"
name = "Access Team"

[dkim]
domain = "example.org"
selector = "relay"
"#,
        server.url("/send")
    );
    let config_path = temp_dir.path().join("relay.toml");
    tokio::fs::write(&config_path, config_content).await?;

    let api_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/send")
            .header("x-api-key", "it-key-42")
            .json_body_partial(
                r#"{
                    "personalizations": [{
                        "to": [{ "email": "access@example.org", "name": "Access Team" }],
                        "dkim_domain": "example.org",
                        "dkim_selector": "relay"
                    }],
                    "from": { "email": "forms@example.org", "name": "Example Forms" }
                }"#,
            );
        then.status(202);
    });

    let config = TomlConfig::from_file(&config_path)?.into_relay_config();
    config.validate()?;
    std::env::remove_var("ACCESS_RELAY_IT_API_KEY");

    let handler = RegistrationHandler::new(MailChannelsDispatcher::from_config(&config)?);
    let body = json!({
        "email": "grace@example.com",
        "first_name": "Grace",
        "last_name": "Hopper",
        "organisation": "Navy"
    });
    let response = handler.handle(InboundRequest::post(body.to_string())).await;

    api_mock.assert();
    assert_eq!(response.status, 200);
    Ok(())
}

#[test]
fn test_missing_config_file_is_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let result = TomlConfig::from_file(temp_dir.path().join("absent.toml"));
    assert!(matches!(result, Err(access_relay::RelayError::Io(_))));
}
