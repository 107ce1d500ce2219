use shared_models::error::AppError;
use user_cell::UserError;

#[derive(Debug, thiserror::Error)]
pub enum VaccineError {
    #[error("No vaccine recommendations.")]
    NoRecommendations,

    #[error("Database error: {0}")]
    Database(String),

    #[error(transparent)]
    User(#[from] UserError),
}

impl From<anyhow::Error> for VaccineError {
    fn from(e: anyhow::Error) -> Self {
        VaccineError::Database(e.to_string())
    }
}

impl From<VaccineError> for AppError {
    fn from(e: VaccineError) -> Self {
        match e {
            VaccineError::NoRecommendations => AppError::NotFound(e.to_string()),
            VaccineError::Database(msg) => AppError::Database(msg),
            VaccineError::User(inner) => inner.into(),
        }
    }
}
