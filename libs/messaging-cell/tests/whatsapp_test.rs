use assert_matches::assert_matches;
use serde_json::json;
use wiremock::{MockServer, Mock, ResponseTemplate};
use wiremock::matchers::{method, path};

use messaging_cell::models::{MessagingError, SendMessageRequest};
use messaging_cell::services::whatsapp::WhatsappService;
use shared_utils::test_utils::{MockSupabaseResponses, TestConfig, TestUser};

fn send_request() -> SendMessageRequest {
    SendMessageRequest {
        to: "+541111111111".to_string(),
        body: "Your appointment is confirmed".to_string(),
        appointment_id: None,
    }
}

#[tokio::test]
async fn test_send_dispatches_to_twilio_and_records_row() {
    let mock_server = MockServer::start().await;

    // Same mock server plays Twilio and Supabase; the paths don't overlap
    Mock::given(method("POST"))
        .and(path("/2010-04-01/Accounts/ACtest/Messages.json"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "sid": "SM900",
            "status": "queued"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/whatsapp_messages"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockSupabaseResponses::message_row("SM900", "p1")
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = TestConfig::with_supabase_url(&mock_server.uri()).to_app_config();
    config.twilio_api_base_url = mock_server.uri();

    let user = TestUser::professional("pro@example.com").to_user();
    let service = WhatsappService::new(&config);

    let message = service.send_message(&user, send_request()).await.unwrap();
    assert_eq!(message.twilio_sid, "SM900");

    // The dispatch carries whatsapp-prefixed addresses as form params
    let requests = mock_server.received_requests().await.unwrap();
    let twilio_call = requests.iter()
        .find(|r| r.url.path().ends_with("/Messages.json"))
        .unwrap();
    let form = String::from_utf8(twilio_call.body.clone()).unwrap();
    assert!(form.contains("To=whatsapp%3A%2B541111111111"));
    assert!(form.contains("From=whatsapp%3A%2B14155238886"));
}

#[tokio::test]
async fn test_twilio_rejection_skips_the_insert() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/2010-04-01/Accounts/ACtest/Messages.json"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "code": 21211,
            "message": "Invalid 'To' phone number"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/whatsapp_messages"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut config = TestConfig::with_supabase_url(&mock_server.uri()).to_app_config();
    config.twilio_api_base_url = mock_server.uri();

    let user = TestUser::professional("pro@example.com").to_user();
    let service = WhatsappService::new(&config);

    let result = service.send_message(&user, send_request()).await;
    assert_matches!(result, Err(MessagingError::SendFailed(_)));
}

#[tokio::test]
async fn test_unconfigured_provider_refuses_to_send() {
    let mut config = TestConfig::default().to_app_config();
    config.twilio_account_sid = String::new();

    let user = TestUser::professional("pro@example.com").to_user();
    let service = WhatsappService::new(&config);

    let result = service.send_message(&user, send_request()).await;
    assert_matches!(result, Err(MessagingError::NotConfigured));
}

#[tokio::test]
async fn test_insert_failure_after_successful_send() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/2010-04-01/Accounts/ACtest/Messages.json"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "sid": "SM901",
            "status": "queued"
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/whatsapp_messages"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "message": "boom"
        })))
        .mount(&mock_server)
        .await;

    let mut config = TestConfig::with_supabase_url(&mock_server.uri()).to_app_config();
    config.twilio_api_base_url = mock_server.uri();

    let user = TestUser::professional("pro@example.com").to_user();
    let service = WhatsappService::new(&config);

    // The message went out but the row is lost; no compensation is attempted
    let result = service.send_message(&user, send_request()).await;
    assert_matches!(result, Err(MessagingError::DatabaseError(_)));
}
