use tracing::debug;

use shared_config::AppConfig;
use shared_database::supabase::{eq, SupabaseClient};
use shared_models::domain::{Clinic, ClinicType};
use user_cell::UserService;

use crate::distance::{sort_by_distance, Coordinates};
use crate::models::ClinicError;

pub struct ClinicService {
    supabase: SupabaseClient,
    users: UserService,
}

impl ClinicService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            users: UserService::new(config),
        }
    }

    pub async fn list_clinics(&self, clinic_type: Option<ClinicType>) -> Result<Vec<Clinic>, ClinicError> {
        let mut query = "select=*,address:addresses(*)".to_string();
        if let Some(t) = clinic_type {
            query.push('&');
            query.push_str(&eq("type", t));
        }
        Ok(self.supabase.select("clinics", &query).await?)
    }

    /// Clinics nearest to `origin`, closest first.
    pub async fn nearest(
        &self,
        origin: Coordinates,
        clinic_limit: usize,
        clinic_type: Option<ClinicType>,
    ) -> Result<Vec<Clinic>, ClinicError> {
        let mut clinics = self.list_clinics(clinic_type).await?;
        debug!("Ranking {} clinics from ({}, {})", clinics.len(), origin.latitude, origin.longitude);

        sort_by_distance(&mut clinics, origin, |c| c.address.as_ref().map(Coordinates::from));
        clinics.truncate(clinic_limit);

        if clinics.is_empty() {
            return Err(ClinicError::NoneFound(clinic_type));
        }
        Ok(clinics)
    }

    pub async fn nearest_to_home(
        &self,
        user_id: &str,
        clinic_limit: usize,
        clinic_type: Option<ClinicType>,
    ) -> Result<Vec<Clinic>, ClinicError> {
        let user = self.users.get_user(user_id).await?;
        let home = user.address.as_ref().ok_or(ClinicError::NoHomeAddress)?;
        self.nearest(Coordinates::from(home), clinic_limit, clinic_type).await
    }
}
