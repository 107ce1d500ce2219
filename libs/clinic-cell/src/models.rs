use serde::Deserialize;

use shared_models::domain::ClinicType;
use shared_models::error::AppError;
use user_cell::UserError;

pub const DEFAULT_CLINIC_LIMIT: usize = 3;

fn default_clinic_limit() -> usize {
    DEFAULT_CLINIC_LIMIT
}

#[derive(Debug, Clone, Deserialize)]
pub struct NearestByHomeQuery {
    #[serde(default = "default_clinic_limit")]
    pub clinic_limit: usize,
    pub clinic_type: Option<ClinicType>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NearestByLocationQuery {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default = "default_clinic_limit")]
    pub clinic_limit: usize,
    pub clinic_type: Option<ClinicType>,
}

fn clinic_label(clinic_type: &Option<ClinicType>) -> &'static str {
    clinic_type.map(|t| t.as_str()).unwrap_or("clinics")
}

#[derive(Debug, thiserror::Error)]
pub enum ClinicError {
    #[error("No {} found.", clinic_label(.0))]
    NoneFound(Option<ClinicType>),

    #[error("No home address on record.")]
    NoHomeAddress,

    #[error("Database error: {0}")]
    Database(String),

    #[error(transparent)]
    User(#[from] UserError),
}

impl From<anyhow::Error> for ClinicError {
    fn from(e: anyhow::Error) -> Self {
        ClinicError::Database(e.to_string())
    }
}

impl From<ClinicError> for AppError {
    fn from(e: ClinicError) -> Self {
        match e {
            ClinicError::NoneFound(_) | ClinicError::NoHomeAddress => AppError::NotFound(e.to_string()),
            ClinicError::Database(msg) => AppError::Database(msg),
            ClinicError::User(inner) => inner.into(),
        }
    }
}
