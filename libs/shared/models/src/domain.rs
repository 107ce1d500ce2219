//! Rows of the booking database and the response shapes shared across cells.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    pub id: Uuid,
    pub postal_code: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClinicType {
    Polyclinic,
    Gp,
}

impl ClinicType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClinicType::Polyclinic => "polyclinic",
            ClinicType::Gp => "gp",
        }
    }
}

impl fmt::Display for ClinicType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clinic {
    pub id: Uuid,
    pub address_id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub clinic_type: ClinicType,
    #[serde(default)]
    pub address: Option<Address>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl Gender {
    pub fn code(&self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthCondition {
    Diabetes,
    Hypertension,
    #[serde(rename = "High Cholesterol")]
    HighCholesterol,
}

impl HealthCondition {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthCondition::Diabetes => "Diabetes",
            HealthCondition::Hypertension => "Hypertension",
            HealthCondition::HighCholesterol => "High Cholesterol",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "Diabetes" => Some(HealthCondition::Diabetes),
            "Hypertension" => Some(HealthCondition::Hypertension),
            "High Cholesterol" => Some(HealthCondition::HighCholesterol),
            _ => None,
        }
    }

    /// Conditions are stored as one comma-joined column.
    pub fn join(conditions: &[HealthCondition]) -> Option<String> {
        if conditions.is_empty() {
            return None;
        }
        Some(
            conditions
                .iter()
                .map(|c| c.as_str())
                .collect::<Vec<_>>()
                .join(","),
        )
    }

    pub fn split(stored: Option<&str>) -> Vec<HealthCondition> {
        stored
            .map(|s| s.split(',').filter_map(HealthCondition::parse).collect())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRow {
    pub id: Uuid,
    pub address_id: Option<Uuid>,
    pub enrolled_clinic_id: Option<Uuid>,
    pub nric: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    #[serde(default)]
    pub health_conditions: Option<String>,
    pub password: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default)]
    pub enrolled_clinic: Option<Clinic>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaccineCriteria {
    pub age_criteria: Option<String>,
    pub gender_criteria: Option<String>,
    pub health_condition_criteria: Option<String>,
    pub doses_required: i32,
    pub frequency: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vaccine {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub vaccine_criterias: Vec<VaccineCriteria>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingSlot {
    pub id: Uuid,
    pub polyclinic_id: Uuid,
    pub vaccine_id: Uuid,
    pub datetime: NaiveDateTime,
    #[serde(default)]
    pub polyclinic: Option<Clinic>,
    #[serde(default)]
    pub vaccine: Option<Vaccine>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Booked,
    Completed,
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordStatus::Booked => f.write_str("booked"),
            RecordStatus::Completed => f.write_str("completed"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaccineRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub booking_slot_id: Uuid,
    pub status: RecordStatus,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Response shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressResponse {
    pub postal_code: String,
    pub address: String,
    pub longitude: f64,
    pub latitude: f64,
}

impl From<&Address> for AddressResponse {
    fn from(address: &Address) -> Self {
        Self {
            postal_code: address.postal_code.clone(),
            address: address.address.clone(),
            longitude: address.longitude,
            latitude: address.latitude,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClinicResponse {
    pub name: String,
    #[serde(rename = "type")]
    pub clinic_type: ClinicType,
    pub address: Option<AddressResponse>,
}

impl From<&Clinic> for ClinicResponse {
    fn from(clinic: &Clinic) -> Self {
        Self {
            name: clinic.name.clone(),
            clinic_type: clinic.clinic_type,
            address: clinic.address.as_ref().map(AddressResponse::from),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolyclinicResponse {
    pub id: Uuid,
    pub name: String,
    pub address: Option<AddressResponse>,
}

impl From<&Clinic> for PolyclinicResponse {
    fn from(clinic: &Clinic) -> Self {
        Self {
            id: clinic.id,
            name: clinic.name.clone(),
            address: clinic.address.as_ref().map(AddressResponse::from),
        }
    }
}
