use chrono::{NaiveDate, Utc};
use tracing::debug;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;
use shared_models::domain::{Gender, Vaccine};
use user_cell::UserService;

use crate::eligibility::{criteria_matches, UserAge};
use crate::models::VaccineError;

pub const VACCINE_WITH_CRITERIA: &str = "select=*,vaccine_criterias:vaccine_criteria(*)";

/// Keeps vaccines with at least one satisfied criteria row, trimmed to the rows
/// that matched. Input order is preserved.
pub fn recommend(vaccines: Vec<Vaccine>, age: UserAge, gender: Gender) -> Vec<Vaccine> {
    vaccines
        .into_iter()
        .filter_map(|mut vaccine| {
            vaccine
                .vaccine_criterias
                .retain(|criteria| criteria_matches(criteria, age, gender));
            (!vaccine.vaccine_criterias.is_empty()).then_some(vaccine)
        })
        .collect()
}

pub struct VaccineService {
    supabase: SupabaseClient,
    users: UserService,
}

impl VaccineService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            users: UserService::new(config),
        }
    }

    pub async fn list_vaccines(&self) -> Result<Vec<Vaccine>, VaccineError> {
        let query = format!("{}&order=name.asc", VACCINE_WITH_CRITERIA);
        Ok(self.supabase.select("vaccines", &query).await?)
    }

    pub async fn recommendations_for(&self, user_id: &str) -> Result<Vec<Vaccine>, VaccineError> {
        self.recommendations_on(user_id, Utc::now().date_naive()).await
    }

    pub async fn recommendations_on(
        &self,
        user_id: &str,
        today: NaiveDate,
    ) -> Result<Vec<Vaccine>, VaccineError> {
        let user = self.users.get_user(user_id).await?;
        let age = UserAge::on(user.date_of_birth, today);
        debug!(user_id, years = age.years, months = age.months, "Computing vaccine recommendations");

        let recommended = recommend(self.list_vaccines().await?, age, user.gender);
        if recommended.is_empty() {
            return Err(VaccineError::NoRecommendations);
        }
        Ok(recommended)
    }
}
