use serde::{Deserialize, Serialize};

/// Claims carried by the bearer tokens this API issues.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    pub user_id: String,
    #[serde(default)]
    pub refresh: bool,
    pub exp: i64,
}

/// The authenticated caller, inserted into request extensions by the auth middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: String,
}

/// Identity recorded against a request in the audit trail.
///
/// Handlers and middleware attach it to the *response* extensions so the audit
/// layer can read it after the inner service has run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditActor(pub String);

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub detail: String,
    pub access_token: String,
    pub token_type: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}
