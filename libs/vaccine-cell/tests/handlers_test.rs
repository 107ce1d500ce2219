use assert_matches::assert_matches;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
};
use chrono::NaiveDate;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shared_utils::test_utils::{JwtTestUtils, MockSupabaseResponses, TestConfig, TestUser};
use vaccine_cell::{vaccine_routes, VaccineError, VaccineService};

async fn mount_user(server: &MockServer, user: &TestUser) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::user_row(user, "hash", None)
        ])))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_recommendations_for_adult_male() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_supabase_url(mock_server.uri()).to_app_config();
    let user = TestUser::default();
    mount_user(&mock_server, &user).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/vaccines"))
        .and(query_param("select", "*,vaccine_criterias:vaccine_criteria(*)"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::vaccine_row(Uuid::new_v4(), "Influenza (INF)", vec![
                MockSupabaseResponses::criteria_row(Some("18-64 years"), Some("None")),
                MockSupabaseResponses::criteria_row(Some("65+ years"), Some("None")),
            ]),
            MockSupabaseResponses::vaccine_row(Uuid::new_v4(), "Human papillomavirus (HPV2)", vec![
                MockSupabaseResponses::criteria_row(Some("18-26 years"), Some("F")),
            ]),
            MockSupabaseResponses::vaccine_row(Uuid::new_v4(), "Rotavirus", vec![
                MockSupabaseResponses::criteria_row(Some("2 months"), None),
            ]),
        ])))
        .mount(&mock_server)
        .await;

    // born 1990-01-01, so 35 on this date
    let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
    let vaccines = VaccineService::new(&config)
        .recommendations_on(&user.id.to_string(), today)
        .await
        .unwrap();

    assert_eq!(vaccines.len(), 1);
    assert_eq!(vaccines[0].name, "Influenza (INF)");
    assert_eq!(vaccines[0].vaccine_criterias.len(), 1);
}

#[tokio::test]
async fn test_no_recommendations() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_supabase_url(mock_server.uri()).to_app_config();
    let user = TestUser::default();
    mount_user(&mock_server, &user).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/vaccines"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::vaccine_row(Uuid::new_v4(), "Rotavirus", vec![
                MockSupabaseResponses::criteria_row(Some("2 months"), None),
            ]),
        ])))
        .mount(&mock_server)
        .await;

    let result = VaccineService::new(&config).recommendations_for(&user.id.to_string()).await;

    assert_matches!(result, Err(VaccineError::NoRecommendations));
}

#[tokio::test]
async fn test_recommendations_route_returns_not_found_detail() {
    let mock_server = MockServer::start().await;
    let test_config = TestConfig::with_supabase_url(mock_server.uri());
    let user = TestUser::default();
    let token = JwtTestUtils::create_test_token(&user, &test_config.jwt_secret, None);
    mount_user(&mock_server, &user).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/vaccines"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let response = vaccine_routes(test_config.to_arc())
        .oneshot(
            Request::builder()
                .uri("/vaccines/recommendations")
                .header("authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["detail"], "No vaccine recommendations.");
}

#[tokio::test]
async fn test_unknown_user_is_not_found() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_supabase_url(mock_server.uri()).to_app_config();

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let result = VaccineService::new(&config)
        .recommendations_for(&Uuid::new_v4().to_string())
        .await;

    assert_matches!(result, Err(VaccineError::User(_)));
}
