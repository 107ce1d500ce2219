use std::collections::HashSet;

use chrono::{NaiveDateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use clinic_cell::distance::Coordinates;
use shared_config::AppConfig;
use shared_database::supabase::{eq, ilike, in_list, SupabaseClient};
use shared_models::domain::{BookingSlot, RecordStatus, VaccineRecord};
use user_cell::UserService;

use crate::models::{
    parse_range_bound, AvailableSlotsQuery, BookingError, RangeEnd, RescheduleSlotRequest,
};
use crate::ranking::{earliest_first, nearest_polyclinics_first};

const SLOT_WITH_POLYCLINIC: &str = "select=*,polyclinic:clinics!inner(*,address:addresses(*))";
const SLOT_WITH_DETAILS: &str =
    "select=*,polyclinic:clinics(*,address:addresses(*)),vaccine:vaccines(*,vaccine_criterias:vaccine_criteria(*))";

#[derive(Debug, Deserialize)]
struct IdRow {
    id: Uuid,
}

#[derive(Debug, Deserialize)]
struct BookedSlotRow {
    booking_slot_id: Uuid,
}

fn timestamp(value: NaiveDateTime) -> String {
    value.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

pub struct BookingService {
    supabase: SupabaseClient,
    users: UserService,
}

impl BookingService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            users: UserService::new(config),
        }
    }

    /// Tokens outlive accounts; every mutating or detail call confirms the user row first.
    async fn ensure_user(&self, user_id: &str) -> Result<(), BookingError> {
        self.users.get_user(user_id).await?;
        Ok(())
    }

    async fn booked_slot_ids(&self) -> Result<HashSet<Uuid>, BookingError> {
        let rows: Vec<BookedSlotRow> = self
            .supabase
            .select("vaccine_records", "select=booking_slot_id")
            .await?;
        Ok(rows.into_iter().map(|r| r.booking_slot_id).collect())
    }

    async fn is_slot_booked(&self, slot_id: Uuid) -> Result<bool, BookingError> {
        let query = format!("select=id&{}", eq("booking_slot_id", slot_id));
        let existing: Option<IdRow> = self.supabase.select_one("vaccine_records", &query).await?;
        Ok(existing.is_some())
    }

    /// Unbooked slots matching the filters, earliest first.
    pub async fn candidate_slots(&self, query: &AvailableSlotsQuery) -> Result<Vec<BookingSlot>, BookingError> {
        let start = query
            .start_datetime
            .as_deref()
            .map(|v| parse_range_bound(v, RangeEnd::Start))
            .transpose()?;
        let end = query
            .end_datetime
            .as_deref()
            .map(|v| parse_range_bound(v, RangeEnd::End))
            .transpose()?;

        let vaccines: Vec<IdRow> = self
            .supabase
            .select("vaccines", &format!("select=id&{}", ilike("name", &query.vaccine_name)))
            .await?;
        if vaccines.is_empty() {
            return Ok(Vec::new());
        }
        let vaccine_ids: Vec<Uuid> = vaccines.iter().map(|v| v.id).collect();

        let mut filters = vec![SLOT_WITH_POLYCLINIC.to_string(), in_list("vaccine_id", &vaccine_ids)];
        if let Some(name) = query.polyclinic_name.as_deref().filter(|n| !n.is_empty()) {
            filters.push(ilike("polyclinic.name", name));
        }
        if let Some(start) = start {
            filters.push(format!("datetime=gte.{}", timestamp(start)));
        }
        if let Some(end) = end {
            filters.push(format!("datetime=lte.{}", timestamp(end)));
        }
        filters.push("order=datetime.asc".to_string());

        let slots: Vec<BookingSlot> = self.supabase.select("booking_slots", &filters.join("&")).await?;
        let booked = self.booked_slot_ids().await?;

        Ok(slots.into_iter().filter(|s| !booked.contains(&s.id)).collect())
    }

    pub async fn available_slots(
        &self,
        user_id: &str,
        query: &AvailableSlotsQuery,
    ) -> Result<Vec<BookingSlot>, BookingError> {
        let slots = self.candidate_slots(query).await?;
        if slots.is_empty() {
            return Err(BookingError::NoAvailableSlots(query.vaccine_name.clone()));
        }

        let user = self.users.get_user(user_id).await?;
        let picked = match user.address.as_ref() {
            Some(home) => nearest_polyclinics_first(
                slots,
                Coordinates::from(home),
                query.polyclinic_limit,
                query.timeslot_limit,
            ),
            None => earliest_first(slots, query.polyclinic_limit, query.timeslot_limit),
        };

        debug!(user_id, recommended = picked.len(), "Recommended booking slots");
        Ok(picked)
    }

    pub async fn find_slot(&self, slot_id: Uuid) -> Result<Option<BookingSlot>, BookingError> {
        let query = format!("select=*&{}", eq("id", slot_id));
        Ok(self.supabase.select_one("booking_slots", &query).await?)
    }

    pub async fn get_slot(&self, user_id: &str, slot_id: &str) -> Result<BookingSlot, BookingError> {
        self.ensure_user(user_id).await?;
        let not_found = || BookingError::SlotNotFound(slot_id.to_string());
        let id = Uuid::parse_str(slot_id).map_err(|_| not_found())?;

        let query = format!("{}&{}", SLOT_WITH_DETAILS, eq("id", id));
        self.supabase
            .select_one::<BookingSlot>("booking_slots", &query)
            .await?
            .ok_or_else(not_found)
    }

    pub async fn schedule(&self, user_id: &str, slot_id: Uuid) -> Result<VaccineRecord, BookingError> {
        self.ensure_user(user_id).await?;
        if self.find_slot(slot_id).await?.is_none() {
            return Err(BookingError::ScheduleSlotNotFound(slot_id));
        }
        if self.is_slot_booked(slot_id).await? {
            return Err(BookingError::AlreadyBooked);
        }

        let now = Utc::now().to_rfc3339();
        let record: VaccineRecord = self
            .supabase
            .insert(
                "vaccine_records",
                json!({
                    "user_id": user_id,
                    "booking_slot_id": slot_id,
                    "status": RecordStatus::Booked,
                    "created_at": now,
                    "updated_at": now,
                }),
            )
            .await?;

        info!(user_id, record_id = %record.id, slot_id = %slot_id, "Vaccination slot booked");
        Ok(record)
    }

    /// Loads a record owned by `user_id` that is still in the booked state.
    async fn owned_booked_record(
        &self,
        user_id: &str,
        record_id: &str,
        on_wrong_status: fn(RecordStatus) -> BookingError,
    ) -> Result<VaccineRecord, BookingError> {
        self.ensure_user(user_id).await?;
        let not_found = || BookingError::RecordNotFound(record_id.to_string());
        let id = Uuid::parse_str(record_id).map_err(|_| not_found())?;

        let record: VaccineRecord = self
            .supabase
            .select_one("vaccine_records", &format!("select=*&{}", eq("id", id)))
            .await?
            .ok_or_else(not_found)?;

        if record.user_id.to_string() != user_id {
            return Err(BookingError::NotOwner);
        }
        if record.status != RecordStatus::Booked {
            return Err(on_wrong_status(record.status));
        }
        Ok(record)
    }

    pub async fn cancel(&self, user_id: &str, record_id: &str) -> Result<(), BookingError> {
        let record = self
            .owned_booked_record(user_id, record_id, BookingError::CannotCancel)
            .await?;

        self.supabase.delete("vaccine_records", &eq("id", record.id)).await?;
        info!(user_id, record_id = %record.id, "Vaccination slot cancelled");
        Ok(())
    }

    pub async fn reschedule(
        &self,
        user_id: &str,
        request: RescheduleSlotRequest,
    ) -> Result<VaccineRecord, BookingError> {
        let record = self
            .owned_booked_record(
                user_id,
                &request.vaccine_record_id.to_string(),
                BookingError::CannotReschedule,
            )
            .await?;

        if self.find_slot(request.new_slot_id).await?.is_none() {
            return Err(BookingError::NewSlotNotFound(request.new_slot_id));
        }
        if self.is_slot_booked(request.new_slot_id).await? {
            return Err(BookingError::AlreadyBooked);
        }

        let updated: Vec<VaccineRecord> = self
            .supabase
            .update(
                "vaccine_records",
                &eq("id", record.id),
                json!({
                    "booking_slot_id": request.new_slot_id,
                    "updated_at": Utc::now().to_rfc3339(),
                }),
            )
            .await?;

        let record = updated
            .into_iter()
            .next()
            .ok_or_else(|| BookingError::RecordNotFound(record.id.to_string()))?;
        info!(user_id, record_id = %record.id, slot_id = %request.new_slot_id, "Vaccination slot rescheduled");
        Ok(record)
    }
}
