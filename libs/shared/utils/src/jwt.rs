use std::str::FromStr;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;

use shared_models::auth::{AccessClaims, CurrentUser};

const DEFAULT_EXPIRY_MINUTES: i64 = 15;

fn parse_algorithm(name: &str) -> Result<Algorithm, String> {
    let algorithm = Algorithm::from_str(name).map_err(|_| format!("Unsupported JWT algorithm {}", name))?;
    match algorithm {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Ok(algorithm),
        _ => Err(format!("Unsupported JWT algorithm {}", name)),
    }
}

/// Issues a signed token for `user_id`. Without an explicit lifetime the token
/// expires after fifteen minutes.
pub fn create_access_token(
    user_id: &str,
    jwt_secret: &str,
    algorithm: &str,
    refresh: bool,
    expires_delta: Option<Duration>,
) -> Result<String, String> {
    if jwt_secret.is_empty() {
        return Err("JWT secret is not set".to_string());
    }

    let expire = Utc::now() + expires_delta.unwrap_or_else(|| Duration::minutes(DEFAULT_EXPIRY_MINUTES));
    let claims = AccessClaims {
        user_id: user_id.to_string(),
        refresh,
        exp: expire.timestamp(),
    };

    let header = Header::new(parse_algorithm(algorithm)?);
    encode(&header, &claims, &EncodingKey::from_secret(jwt_secret.as_bytes()))
        .map_err(|e| format!("Failed to sign token: {}", e))
}

pub fn validate_token(token: &str, jwt_secret: &str, algorithm: &str) -> Result<CurrentUser, String> {
    if jwt_secret.is_empty() {
        return Err("JWT secret is not set".to_string());
    }

    let validation = Validation::new(parse_algorithm(algorithm)?);

    let data = decode::<AccessClaims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        debug!("Token rejected: {}", e);
        "Invalid token".to_string()
    })?;

    let claims = data.claims;
    if claims.refresh {
        debug!("Refresh token presented as access token for user {}", claims.user_id);
        return Err("Refresh tokens cannot be used for access".to_string());
    }
    if claims.user_id.is_empty() {
        return Err("Token has no subject".to_string());
    }

    debug!("Token validated successfully for user: {}", claims.user_id);
    Ok(CurrentUser { id: claims.user_id })
}
