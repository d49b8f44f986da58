use assert_matches::assert_matches;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::{MockServer, Mock, ResponseTemplate};
use wiremock::matchers::{method, path, path_regex};

use account_cell::models::AccountError;
use account_cell::router::account_routes;
use account_cell::services::erasure::AccountErasureService;
use shared_utils::test_utils::{JwtTestUtils, TestConfig, TestUser};

const DEPENDENT_TABLES: [&str; 7] = [
    "gcal_tokens",
    "appointments",
    "patients",
    "services",
    "whatsapp_messages",
    "user_integrations",
    "profiles",
];

async fn mount_dependent_deletes(mock_server: &MockServer, status: u16) {
    for table in DEPENDENT_TABLES {
        Mock::given(method("DELETE"))
            .and(path(format!("/rest/v1/{}", table)))
            .respond_with(ResponseTemplate::new(status))
            .expect(1)
            .mount(mock_server)
            .await;
    }
}

#[tokio::test]
async fn test_erasure_deletes_all_tables_then_identity() {
    let mock_server = MockServer::start().await;
    let test_user = TestUser::professional("pro@example.com");

    mount_dependent_deletes(&mock_server, 204).await;

    Mock::given(method("DELETE"))
        .and(path_regex(r"^/auth/v1/admin/users/.+$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = TestConfig::with_supabase_url(&mock_server.uri()).to_app_config();
    let service = AccountErasureService::new(&config);

    service.erase_account(&test_user.to_user()).await.unwrap();
}

#[tokio::test]
async fn test_erasure_with_no_prior_data_still_succeeds() {
    let mock_server = MockServer::start().await;
    let test_user = TestUser::professional("fresh@example.com");

    // PostgREST reports the same 204 whether or not any rows matched
    mount_dependent_deletes(&mock_server, 204).await;

    Mock::given(method("DELETE"))
        .and(path(format!("/auth/v1/admin/users/{}", test_user.id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = TestConfig::with_supabase_url(&mock_server.uri()).to_app_config();
    let service = AccountErasureService::new(&config);

    service.erase_account(&test_user.to_user()).await.unwrap();
}

#[tokio::test]
async fn test_dependent_failure_does_not_stop_identity_deletion() {
    let mock_server = MockServer::start().await;
    let test_user = TestUser::professional("pro@example.com");

    for table in DEPENDENT_TABLES {
        let status = if table == "patients" { 500 } else { 204 };
        Mock::given(method("DELETE"))
            .and(path(format!("/rest/v1/{}", table)))
            .respond_with(ResponseTemplate::new(status))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    Mock::given(method("DELETE"))
        .and(path_regex(r"^/auth/v1/admin/users/.+$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = TestConfig::with_supabase_url(&mock_server.uri()).to_app_config();
    let service = AccountErasureService::new(&config);

    // Partial erasure: the patients deletion failed, the rest proceeded and
    // the identity is gone anyway
    service.erase_account(&test_user.to_user()).await.unwrap();
}

#[tokio::test]
async fn test_identity_deletion_failure_surfaces() {
    let mock_server = MockServer::start().await;
    let test_user = TestUser::professional("pro@example.com");

    mount_dependent_deletes(&mock_server, 204).await;

    Mock::given(method("DELETE"))
        .and(path_regex(r"^/auth/v1/admin/users/.+$"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "message": "auth service unavailable"
        })))
        .mount(&mock_server)
        .await;

    let config = TestConfig::with_supabase_url(&mock_server.uri()).to_app_config();
    let service = AccountErasureService::new(&config);

    let result = service.erase_account(&test_user.to_user()).await;
    assert_matches!(result, Err(AccountError::IdentityDeletionFailed(_)));
}

#[tokio::test]
async fn test_unauthenticated_erasure_performs_zero_deletions() {
    let mock_server = MockServer::start().await;

    let config = TestConfig::with_supabase_url(&mock_server.uri());
    let app = account_routes(config.to_arc());

    let request = Request::builder()
        .method("DELETE")
        .uri("/")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_authenticated_erasure_endpoint() {
    let mock_server = MockServer::start().await;
    let test_user = TestUser::professional("pro@example.com");

    mount_dependent_deletes(&mock_server, 204).await;

    Mock::given(method("DELETE"))
        .and(path(format!("/auth/v1/admin/users/{}", test_user.id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = TestConfig::with_supabase_url(&mock_server.uri());
    let app_config = config.to_app_config();
    let token = JwtTestUtils::create_test_token(&test_user, &app_config.supabase_jwt_secret, Some(24));
    let app = account_routes(std::sync::Arc::new(app_config));

    let request = Request::builder()
        .method("DELETE")
        .uri("/")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json_response: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json_response["success"], true);
}
