use chrono::NaiveDateTime;
use serde::Deserialize;

use shared_models::domain::VaccineRecord;
use shared_models::error::AppError;
use user_cell::UserError;

#[derive(Debug, Clone, Deserialize)]
pub struct SlotTime {
    pub datetime: NaiveDateTime,
}

/// A record row with the time of its booking slot embedded.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordWithSlot {
    #[serde(flatten)]
    pub record: VaccineRecord,
    #[serde(default)]
    pub booking_slot: Option<SlotTime>,
}

#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("No records found.")]
    NoneFound,

    #[error("Record with record id {0} not found.")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error(transparent)]
    User(#[from] UserError),
}

impl From<anyhow::Error> for RecordError {
    fn from(e: anyhow::Error) -> Self {
        RecordError::Database(e.to_string())
    }
}

impl From<RecordError> for AppError {
    fn from(e: RecordError) -> Self {
        match e {
            RecordError::NoneFound | RecordError::NotFound(_) => AppError::NotFound(e.to_string()),
            RecordError::Database(msg) => AppError::Database(msg),
            RecordError::User(inner) => inner.into(),
        }
    }
}
