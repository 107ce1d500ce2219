use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_models::domain::{BookingSlot, PolyclinicResponse, RecordStatus, Vaccine};
use shared_models::error::AppError;
use user_cell::UserError;

pub const DEFAULT_POLYCLINIC_LIMIT: usize = 3;
pub const DEFAULT_TIMESLOT_LIMIT: usize = 1;

fn default_polyclinic_limit() -> usize {
    DEFAULT_POLYCLINIC_LIMIT
}

fn default_timeslot_limit() -> usize {
    DEFAULT_TIMESLOT_LIMIT
}

#[derive(Debug, Clone, Deserialize)]
pub struct AvailableSlotsQuery {
    pub vaccine_name: String,
    pub polyclinic_name: Option<String>,
    pub start_datetime: Option<String>,
    pub end_datetime: Option<String>,
    #[serde(default = "default_polyclinic_limit")]
    pub polyclinic_limit: usize,
    #[serde(default = "default_timeslot_limit")]
    pub timeslot_limit: usize,
}

/// Which end of a range a date-only value stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeEnd {
    Start,
    End,
}

/// Parses a range bound. A bare date widens to the first or last instant of that
/// day; offsets are converted to UTC.
pub fn parse_range_bound(value: &str, end: RangeEnd) -> Result<NaiveDateTime, BookingError> {
    let value = value.trim();

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        let time = match end {
            RangeEnd::Start => NaiveTime::from_hms_opt(0, 0, 0),
            RangeEnd::End => NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999),
        }
        .ok_or_else(|| BookingError::InvalidDatetime(value.to_string()))?;
        return Ok(date.and_time(time));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.naive_utc());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(dt);
        }
    }
    Err(BookingError::InvalidDatetime(value.to_string()))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableSlotResponse {
    pub id: Uuid,
    pub datetime: NaiveDateTime,
    pub polyclinic: Option<PolyclinicResponse>,
    pub vaccine_id: Uuid,
}

impl From<&BookingSlot> for AvailableSlotResponse {
    fn from(slot: &BookingSlot) -> Self {
        Self {
            id: slot.id,
            datetime: slot.datetime,
            polyclinic: slot.polyclinic.as_ref().map(PolyclinicResponse::from),
            vaccine_id: slot.vaccine_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingSlotResponse {
    pub id: Uuid,
    pub datetime: NaiveDateTime,
    pub polyclinic: Option<PolyclinicResponse>,
    pub vaccine: Option<Vaccine>,
}

impl From<BookingSlot> for BookingSlotResponse {
    fn from(slot: BookingSlot) -> Self {
        Self {
            id: slot.id,
            datetime: slot.datetime,
            polyclinic: slot.polyclinic.as_ref().map(PolyclinicResponse::from),
            vaccine: slot.vaccine,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleSlotRequest {
    pub booking_slot_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RescheduleSlotRequest {
    pub vaccine_record_id: Uuid,
    pub new_slot_id: Uuid,
}

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("No available slots for {0}.")]
    NoAvailableSlots(String),

    #[error("Slot with booking id {0} not found.")]
    SlotNotFound(String),

    #[error("Booking slot with slot id {0} not found.")]
    ScheduleSlotNotFound(Uuid),

    #[error("Booking slot with ID {0} not found.")]
    NewSlotNotFound(Uuid),

    #[error("Vaccine record with id {0} not found.")]
    RecordNotFound(String),

    #[error("You are not authorized to cancel this vaccination slot.")]
    NotOwner,

    #[error("Cannot cancel slot with status '{0}'.")]
    CannotCancel(RecordStatus),

    #[error("Cannot reschedule slot with status '{0}'.")]
    CannotReschedule(RecordStatus),

    #[error("Slot already booked.")]
    AlreadyBooked,

    #[error("Invalid datetime '{0}'.")]
    InvalidDatetime(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error(transparent)]
    User(#[from] UserError),
}

impl From<anyhow::Error> for BookingError {
    fn from(e: anyhow::Error) -> Self {
        BookingError::Database(e.to_string())
    }
}

impl From<BookingError> for AppError {
    fn from(e: BookingError) -> Self {
        match e {
            BookingError::NoAvailableSlots(_)
            | BookingError::SlotNotFound(_)
            | BookingError::ScheduleSlotNotFound(_)
            | BookingError::NewSlotNotFound(_)
            | BookingError::RecordNotFound(_) => AppError::NotFound(e.to_string()),
            BookingError::NotOwner => AppError::Auth(e.to_string()),
            BookingError::CannotCancel(_)
            | BookingError::CannotReschedule(_)
            | BookingError::AlreadyBooked => AppError::BadRequest(e.to_string()),
            BookingError::InvalidDatetime(_) => AppError::ValidationError(e.to_string()),
            BookingError::Database(msg) => AppError::Database(msg),
            BookingError::User(inner) => inner.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").unwrap()
    }

    #[test]
    fn date_only_bounds_cover_whole_day() {
        assert_eq!(parse_range_bound("2025-03-10", RangeEnd::Start).unwrap(), at("2025-03-10T00:00:00"));
        assert_eq!(
            parse_range_bound("2025-03-10", RangeEnd::End).unwrap(),
            at("2025-03-10T23:59:59.999999")
        );
    }

    #[test]
    fn full_datetimes_are_kept() {
        assert_eq!(parse_range_bound("2025-03-10T09:30:00", RangeEnd::End).unwrap(), at("2025-03-10T09:30:00"));
        assert_eq!(
            parse_range_bound("2025-03-10T09:30:00+08:00", RangeEnd::Start).unwrap(),
            at("2025-03-10T01:30:00")
        );
    }

    #[test]
    fn garbage_is_rejected() {
        assert_matches!(parse_range_bound("next tuesday", RangeEnd::Start), Err(BookingError::InvalidDatetime(_)));
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            BookingError::CannotCancel(RecordStatus::Completed).to_string(),
            "Cannot cancel slot with status 'completed'."
        );
        assert_eq!(
            BookingError::NoAvailableSlots("Influenza".to_string()).to_string(),
            "No available slots for Influenza."
        );
    }
}
