use chrono::{Duration, Utc};
use serde_json::json;
use tracing::{debug, info, warn};

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;
use shared_models::auth::TokenResponse;
use shared_models::domain::{HealthCondition, UserRow};
use shared_utils::jwt::create_access_token;
use user_cell::UserService;

use crate::models::{AuthError, SignupRequest, UserCreateResponse};
use crate::services::PasswordService;

pub struct AuthService {
    supabase: SupabaseClient,
    users: UserService,
    jwt_secret: String,
    jwt_algorithm: String,
    token_lifetime: Duration,
}

impl AuthService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            users: UserService::new(config),
            jwt_secret: config.jwt_secret.clone(),
            jwt_algorithm: config.jwt_algorithm.clone(),
            token_lifetime: Duration::minutes(config.access_token_expire_minutes),
        }
    }

    pub async fn signup(&self, request: SignupRequest) -> Result<UserCreateResponse, AuthError> {
        let profile = request.profile.normalize()?;
        debug!("Signing up {}", profile.email);

        if self
            .users
            .find_by_email_or_nric(&profile.email, &profile.nric)
            .await?
            .is_some()
        {
            return Err(AuthError::AlreadyExists);
        }

        if request.password != request.password_confirm {
            return Err(AuthError::PasswordMismatch);
        }

        let address_id = self
            .users
            .find_address_by_postal_code(&request.postal_code)
            .await?
            .map(|a| a.id);
        if address_id.is_none() {
            debug!("No address on record for postal code {}", request.postal_code);
        }

        let password_hash = PasswordService::hash_password(&request.password)
            .map_err(|e| AuthError::Hashing(e.to_string()))?;

        let conditions = profile.health_conditions.as_deref().unwrap_or_default();
        let now = Utc::now().to_rfc3339();
        let row = json!({
            "nric": profile.nric,
            "first_name": profile.first_name,
            "last_name": profile.last_name,
            "email": profile.email,
            "date_of_birth": profile.date_of_birth.format("%Y-%m-%d").to_string(),
            "gender": profile.gender,
            "health_conditions": HealthCondition::join(conditions),
            "address_id": address_id,
            "password": password_hash,
            "created_at": now,
            "updated_at": now,
        });

        let user: UserRow = self.supabase.insert("users", row).await?;
        info!(user_id = %user.id, "User signed up");

        Ok(UserCreateResponse {
            id: user.id,
            email: user.email,
            created_at: user.created_at,
        })
    }

    /// Verifies credentials and issues an access token. Returns the user id alongside the token.
    pub async fn login(&self, email: &str, password: &str) -> Result<(String, TokenResponse), AuthError> {
        let Some(user) = self.users.find_by_email(email).await? else {
            warn!("Login attempt for unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        if !PasswordService::verify_password(password, &user.password) {
            warn!(user_id = %user.id, "Login attempt with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let user_id = user.id.to_string();
        let access_token = create_access_token(
            &user_id,
            &self.jwt_secret,
            &self.jwt_algorithm,
            false,
            Some(self.token_lifetime),
        )
        .map_err(AuthError::Token)?;

        info!(user_id = %user_id, "User logged in");
        Ok((
            user_id,
            TokenResponse {
                detail: "Login successful.".to_string(),
                access_token,
                token_type: "bearer".to_string(),
            },
        ))
    }
}
