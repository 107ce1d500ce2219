use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_models::domain::{AddressResponse, ClinicResponse, Gender, HealthCondition, UserRow};
use shared_models::error::AppError;

/// Profile fields shared by signup and profile updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfileInput {
    pub nric: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    #[serde(default)]
    pub health_conditions: Option<Vec<HealthCondition>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(flatten)]
    pub profile: UserProfileInput,
    pub postal_code: String,
    pub enrolled_clinic_postal_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub nric: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub health_conditions: Option<Vec<HealthCondition>>,
    pub address: Option<AddressResponse>,
    pub enrolled_clinic: Option<ClinicResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&UserRow> for UserResponse {
    fn from(row: &UserRow) -> Self {
        let conditions = HealthCondition::split(row.health_conditions.as_deref());
        Self {
            nric: row.nric.clone(),
            first_name: row.first_name.clone(),
            last_name: row.last_name.clone(),
            email: row.email.clone(),
            date_of_birth: row.date_of_birth,
            gender: row.gender,
            health_conditions: if conditions.is_empty() { None } else { Some(conditions) },
            address: row.address.as_ref().map(AddressResponse::from),
            enrolled_clinic: row.enrolled_clinic.as_ref().map(ClinicResponse::from),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserUpdateResponse {
    pub id: Uuid,
    pub email: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("User with user id {0} not found.")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("You are not authorized to delete this user.")]
    Forbidden,

    #[error("Database error: {0}")]
    Database(String),
}

impl From<anyhow::Error> for UserError {
    fn from(e: anyhow::Error) -> Self {
        UserError::Database(e.to_string())
    }
}

impl From<UserError> for AppError {
    fn from(e: UserError) -> Self {
        match e {
            UserError::NotFound(_) => AppError::NotFound(e.to_string()),
            UserError::Validation(msg) => AppError::ValidationError(msg),
            UserError::Forbidden => AppError::Auth(e.to_string()),
            UserError::Database(msg) => AppError::Database(msg),
        }
    }
}
