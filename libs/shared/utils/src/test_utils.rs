use std::sync::Arc;

use chrono::Duration;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;

use crate::jwt::create_access_token;

pub struct TestConfig {
    pub jwt_secret: String,
    pub supabase_url: String,
    pub supabase_anon_key: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "760e1f0c95052fe205f6189f6ad153ca3758b17bb8d9e0d4f78602894e448517".to_string(),
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: "test-anon-key".to_string(),
        }
    }
}

impl TestConfig {
    pub fn with_supabase_url(url: impl Into<String>) -> Self {
        Self {
            supabase_url: url.into(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_anon_key: self.supabase_anon_key.clone(),
            jwt_secret: self.jwt_secret.clone(),
            jwt_algorithm: "HS256".to_string(),
            access_token_expire_minutes: 30,
            audit_source_name: "vaccination-booking-api-test".to_string(),
            ..Default::default()
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct TestUser {
    pub id: Uuid,
    pub email: String,
    pub nric: String,
}

impl Default for TestUser {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            email: "john.doe@example.com".to_string(),
            nric: "S9999999J".to_string(),
        }
    }
}

impl TestUser {
    pub fn new(email: &str, nric: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.to_string(),
            nric: nric.to_string(),
        }
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(user: &TestUser, secret: &str, exp_minutes: Option<i64>) -> String {
        create_access_token(
            &user.id.to_string(),
            secret,
            "HS256",
            false,
            Some(Duration::minutes(exp_minutes.unwrap_or(30))),
        )
        .expect("test token")
    }

    pub fn create_expired_token(user: &TestUser, secret: &str) -> String {
        Self::create_test_token(user, secret, Some(-120))
    }

    pub fn create_refresh_token(user: &TestUser, secret: &str) -> String {
        create_access_token(&user.id.to_string(), secret, "HS256", true, None).expect("test token")
    }

    pub fn create_invalid_signature_token(user: &TestUser) -> String {
        Self::create_test_token(user, "wrong-secret", Some(30))
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }
}

/// Rows shaped like the database REST API returns them.
pub struct MockSupabaseResponses;

impl MockSupabaseResponses {
    pub fn address_row(id: Uuid, postal_code: &str, latitude: f64, longitude: f64) -> Value {
        json!({
            "id": id,
            "postal_code": postal_code,
            "address": format!("Block {} Test Street", postal_code),
            "latitude": latitude,
            "longitude": longitude
        })
    }

    pub fn clinic_row(id: Uuid, name: &str, clinic_type: &str, address: Value) -> Value {
        json!({
            "id": id,
            "address_id": address["id"],
            "name": name,
            "type": clinic_type,
            "address": address
        })
    }

    pub fn user_row(user: &TestUser, password_hash: &str, address: Option<Value>) -> Value {
        json!({
            "id": user.id,
            "address_id": address.as_ref().map(|a| a["id"].clone()),
            "enrolled_clinic_id": null,
            "nric": user.nric,
            "first_name": "John",
            "last_name": "Doe",
            "email": user.email,
            "date_of_birth": "1990-01-01",
            "gender": "M",
            "health_conditions": null,
            "password": password_hash,
            "created_at": "2025-01-01T00:00:00+00:00",
            "updated_at": "2025-01-01T00:00:00+00:00",
            "address": address,
            "enrolled_clinic": null
        })
    }

    pub fn vaccine_row(id: Uuid, name: &str, criteria: Vec<Value>) -> Value {
        json!({
            "id": id,
            "name": name,
            "vaccine_criterias": criteria
        })
    }

    pub fn criteria_row(age: Option<&str>, gender: Option<&str>) -> Value {
        json!({
            "age_criteria": age,
            "gender_criteria": gender,
            "health_condition_criteria": "None",
            "doses_required": 1,
            "frequency": "Annually"
        })
    }

    pub fn slot_row(id: Uuid, datetime: &str, clinic: Value, vaccine_id: Uuid) -> Value {
        json!({
            "id": id,
            "polyclinic_id": clinic["id"],
            "vaccine_id": vaccine_id,
            "datetime": datetime,
            "polyclinic": clinic
        })
    }

    pub fn record_row(id: Uuid, user_id: Uuid, slot_id: Uuid, status: &str) -> Value {
        json!({
            "id": id,
            "user_id": user_id,
            "booking_slot_id": slot_id,
            "status": status,
            "created_at": "2025-02-01T08:00:00+00:00"
        })
    }

    pub fn error_response(message: &str, code: &str) -> Value {
        json!({
            "message": message,
            "code": code
        })
    }
}
