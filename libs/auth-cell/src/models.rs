use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_models::error::AppError;
use user_cell::models::{UserError, UserProfileInput};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    #[serde(flatten)]
    pub profile: UserProfileInput,
    pub postal_code: String,
    pub password: String,
    pub password_confirm: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreateResponse {
    pub id: Uuid,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("User with email or NRIC already exists.")]
    AlreadyExists,

    #[error("Password and password confirmation do not match.")]
    PasswordMismatch,

    #[error("Incorrect username or password.")]
    InvalidCredentials,

    #[error("Could not issue token: {0}")]
    Token(String),

    #[error("Could not hash password: {0}")]
    Hashing(String),

    #[error(transparent)]
    User(#[from] UserError),
}

impl From<anyhow::Error> for AuthError {
    fn from(e: anyhow::Error) -> Self {
        AuthError::User(UserError::Database(e.to_string()))
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::AlreadyExists => AppError::Conflict(e.to_string()),
            AuthError::PasswordMismatch => AppError::BadRequest(e.to_string()),
            AuthError::InvalidCredentials => AppError::Auth(e.to_string()),
            AuthError::Token(msg) | AuthError::Hashing(msg) => AppError::Internal(msg),
            AuthError::User(inner) => inner.into(),
        }
    }
}
