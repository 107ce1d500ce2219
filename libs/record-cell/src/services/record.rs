use std::cmp::Reverse;

use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::{eq, SupabaseClient};
use shared_models::domain::VaccineRecord;
use user_cell::UserService;

use crate::models::{RecordError, RecordWithSlot};

const RECORD_WITH_SLOT_TIME: &str = "select=*,booking_slot:booking_slots!inner(datetime)";

/// Latest appointment first; records whose slot is missing go last.
pub fn order_by_slot_desc(mut rows: Vec<RecordWithSlot>) -> Vec<VaccineRecord> {
    rows.sort_by_key(|row| Reverse(row.booking_slot.as_ref().map(|s| s.datetime)));
    rows.into_iter().map(|row| row.record).collect()
}

pub struct RecordService {
    supabase: SupabaseClient,
    users: UserService,
}

impl RecordService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            users: UserService::new(config),
        }
    }

    pub async fn list_records(&self, user_id: &str) -> Result<Vec<VaccineRecord>, RecordError> {
        self.users.get_user(user_id).await?;
        let query = format!("{}&{}", RECORD_WITH_SLOT_TIME, eq("user_id", user_id));
        let rows: Vec<RecordWithSlot> = self.supabase.select("vaccine_records", &query).await?;
        debug!(user_id, count = rows.len(), "Loaded vaccination records");

        if rows.is_empty() {
            return Err(RecordError::NoneFound);
        }
        Ok(order_by_slot_desc(rows))
    }

    pub async fn get_record(&self, user_id: &str, record_id: &str) -> Result<VaccineRecord, RecordError> {
        self.users.get_user(user_id).await?;
        let not_found = || RecordError::NotFound(record_id.to_string());
        let id = Uuid::parse_str(record_id).map_err(|_| not_found())?;

        let query = format!("select=*&{}&{}", eq("id", id), eq("user_id", user_id));
        self.supabase
            .select_one::<VaccineRecord>("vaccine_records", &query)
            .await?
            .ok_or_else(not_found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(slot_time: Option<&str>) -> RecordWithSlot {
        serde_json::from_value(json!({
            "id": Uuid::new_v4(),
            "user_id": Uuid::new_v4(),
            "booking_slot_id": Uuid::new_v4(),
            "status": "booked",
            "created_at": "2025-01-01T00:00:00Z",
            "booking_slot": slot_time.map(|t| json!({ "datetime": t }))
        }))
        .unwrap()
    }

    #[test]
    fn latest_slot_first() {
        let rows = vec![
            row(Some("2025-01-05T09:00:00")),
            row(None),
            row(Some("2025-03-01T09:00:00")),
            row(Some("2025-02-01T09:00:00")),
        ];
        let ids: Vec<_> = rows.iter().map(|r| r.record.id).collect();

        let ordered = order_by_slot_desc(rows);

        let ordered_ids: Vec<_> = ordered.iter().map(|r| r.id).collect();
        assert_eq!(ordered_ids, vec![ids[2], ids[3], ids[0], ids[1]]);
    }
}
