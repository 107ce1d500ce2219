use assert_matches::assert_matches;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use record_cell::{record_routes, RecordError, RecordService};
use shared_utils::test_utils::{JwtTestUtils, MockSupabaseResponses, TestConfig, TestUser};

async fn mount_user(server: &MockServer, user: &TestUser) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::user_row(user, "hash", None)
        ])))
        .mount(server)
        .await;
}

fn with_slot_time(mut record: Value, datetime: &str) -> Value {
    record["booking_slot"] = json!({ "datetime": datetime });
    record
}

#[tokio::test]
async fn test_list_records_latest_first() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_supabase_url(mock_server.uri()).to_app_config();
    let user = TestUser::default();
    let older = Uuid::new_v4();
    let newer = Uuid::new_v4();
    mount_user(&mock_server, &user).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/vaccine_records"))
        .and(query_param("user_id", format!("eq.{}", user.id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            with_slot_time(MockSupabaseResponses::record_row(older, user.id, Uuid::new_v4(), "completed"), "2024-11-01T10:00:00"),
            with_slot_time(MockSupabaseResponses::record_row(newer, user.id, Uuid::new_v4(), "booked"), "2025-04-01T10:00:00"),
        ])))
        .mount(&mock_server)
        .await;

    let records = RecordService::new(&config).list_records(&user.id.to_string()).await.unwrap();

    let ids: Vec<_> = records.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![newer, older]);
}

#[tokio::test]
async fn test_list_records_empty_is_not_found() {
    let mock_server = MockServer::start().await;
    let test_config = TestConfig::with_supabase_url(mock_server.uri());
    let user = TestUser::default();
    let token = JwtTestUtils::create_test_token(&user, &test_config.jwt_secret, None);
    mount_user(&mock_server, &user).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/vaccine_records"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let response = record_routes(test_config.to_arc())
        .oneshot(
            Request::builder()
                .uri("/records")
                .header("authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["detail"], "No records found.");
}

#[tokio::test]
async fn test_get_record_scoped_to_owner() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_supabase_url(mock_server.uri()).to_app_config();
    let user = TestUser::default();
    let record_id = Uuid::new_v4();
    mount_user(&mock_server, &user).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/vaccine_records"))
        .and(query_param("id", format!("eq.{}", record_id)))
        .and(query_param("user_id", format!("eq.{}", user.id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::record_row(record_id, user.id, Uuid::new_v4(), "booked")
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let record = RecordService::new(&config)
        .get_record(&user.id.to_string(), &record_id.to_string())
        .await
        .unwrap();

    assert_eq!(record.id, record_id);
}

#[tokio::test]
async fn test_get_record_missing() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_supabase_url(mock_server.uri()).to_app_config();
    let user = TestUser::default();
    mount_user(&mock_server, &user).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/vaccine_records"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let record_id = Uuid::new_v4().to_string();
    let result = RecordService::new(&config)
        .get_record(&user.id.to_string(), &record_id)
        .await;

    assert_matches!(result, Err(RecordError::NotFound(id)) if id == record_id);
}

async fn status_with_token(token: &str) -> StatusCode {
    let test_config = TestConfig::default();
    record_routes(test_config.to_arc())
        .oneshot(
            Request::builder()
                .uri("/records")
                .header("authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
        .status()
}

#[tokio::test]
async fn test_rejected_tokens() {
    let test_config = TestConfig::default();
    let user = TestUser::default();

    let expired = JwtTestUtils::create_expired_token(&user, &test_config.jwt_secret);
    let refresh = JwtTestUtils::create_refresh_token(&user, &test_config.jwt_secret);
    let forged = JwtTestUtils::create_invalid_signature_token(&user);
    let malformed = JwtTestUtils::create_malformed_token();

    for token in [expired, refresh, forged, malformed] {
        assert_eq!(status_with_token(&token).await, StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn test_store_failure_is_server_error() {
    let mock_server = MockServer::start().await;
    let test_config = TestConfig::with_supabase_url(mock_server.uri());
    let user = TestUser::default();
    let token = JwtTestUtils::create_test_token(&user, &test_config.jwt_secret, None);
    mount_user(&mock_server, &user).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/vaccine_records"))
        .respond_with(ResponseTemplate::new(500).set_body_json(
            MockSupabaseResponses::error_response("relation does not exist", "42P01"),
        ))
        .mount(&mock_server)
        .await;

    let response = record_routes(test_config.to_arc())
        .oneshot(
            Request::builder()
                .uri("/records")
                .header("authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_deleted_user_cannot_list_records() {
    let mock_server = MockServer::start().await;
    let test_config = TestConfig::with_supabase_url(mock_server.uri());
    let user = TestUser::default();
    let token = JwtTestUtils::create_test_token(&user, &test_config.jwt_secret, None);

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/vaccine_records"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let response = record_routes(test_config.to_arc())
        .oneshot(
            Request::builder()
                .uri(format!("/records/{}", Uuid::new_v4()))
                .header("authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["detail"], format!("User with user id {} not found.", user.id));
}
