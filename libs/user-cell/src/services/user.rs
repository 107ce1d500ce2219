use chrono::Utc;
use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::{eq, SupabaseClient};
use shared_models::domain::{Address, Clinic, HealthCondition, UserRow};

use crate::models::{UpdateUserRequest, UserError, UserUpdateResponse};

const USER_WITH_RELATIONS: &str =
    "select=*,address:addresses(*),enrolled_clinic:clinics(*,address:addresses(*))";

pub struct UserService {
    supabase: SupabaseClient,
}

impl UserService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Loads a user with home address and enrolled clinic embedded.
    pub async fn get_user(&self, user_id: &str) -> Result<UserRow, UserError> {
        debug!("Fetching user {}", user_id);

        let id = Uuid::parse_str(user_id).map_err(|_| UserError::NotFound(user_id.to_string()))?;
        let query = format!("{}&{}", USER_WITH_RELATIONS, eq("id", id));

        self.supabase
            .select_one::<UserRow>("users", &query)
            .await?
            .ok_or_else(|| UserError::NotFound(user_id.to_string()))
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserRow>, UserError> {
        let query = format!("select=*&{}", eq("email", email));
        Ok(self.supabase.select_one::<UserRow>("users", &query).await?)
    }

    pub async fn find_by_email_or_nric(
        &self,
        email: &str,
        nric: &str,
    ) -> Result<Option<UserRow>, UserError> {
        let filter = format!("(email.eq.\"{}\",nric.eq.\"{}\")", email, nric);
        let query = format!("select=*&or={}", urlencoding::encode(&filter));
        Ok(self.supabase.select_one::<UserRow>("users", &query).await?)
    }

    pub async fn find_address_by_postal_code(
        &self,
        postal_code: &str,
    ) -> Result<Option<Address>, UserError> {
        let query = format!("select=*&{}", eq("postal_code", postal_code));
        Ok(self.supabase.select_one::<Address>("addresses", &query).await?)
    }

    /// The clinic whose address carries `postal_code`.
    pub async fn find_clinic_by_postal_code(
        &self,
        postal_code: &str,
    ) -> Result<Option<Clinic>, UserError> {
        let query = format!(
            "select=*,address:addresses!inner(*)&{}",
            eq("address.postal_code", postal_code)
        );
        Ok(self.supabase.select_one::<Clinic>("clinics", &query).await?)
    }

    pub async fn update_profile(
        &self,
        user_id: &str,
        request: UpdateUserRequest,
    ) -> Result<UserUpdateResponse, UserError> {
        let existing = self.get_user(user_id).await?;
        let profile = request.profile.normalize()?;

        let address_id = self
            .find_address_by_postal_code(&request.postal_code)
            .await?
            .map(|a| a.id);
        let clinic_id = self
            .find_clinic_by_postal_code(&request.enrolled_clinic_postal_code)
            .await?
            .map(|c| c.id);

        let conditions = profile.health_conditions.as_deref().unwrap_or_default();
        let changes = json!({
            "nric": profile.nric,
            "first_name": profile.first_name,
            "last_name": profile.last_name,
            "email": profile.email,
            "date_of_birth": profile.date_of_birth.format("%Y-%m-%d").to_string(),
            "gender": profile.gender,
            "health_conditions": HealthCondition::join(conditions),
            "address_id": address_id,
            "enrolled_clinic_id": clinic_id,
            "updated_at": Utc::now().to_rfc3339(),
        });

        let updated: Vec<UserRow> = self
            .supabase
            .update("users", &eq("id", existing.id), changes)
            .await?;
        let user = updated
            .into_iter()
            .next()
            .ok_or_else(|| UserError::NotFound(user_id.to_string()))?;

        info!(user_id = %user.id, "User profile updated");
        Ok(UserUpdateResponse {
            id: user.id,
            email: user.email,
            updated_at: user.updated_at,
        })
    }

    /// Deletes `target_id` on behalf of `caller_id`. Callers may only delete themselves.
    pub async fn delete_user(&self, caller_id: &str, target_id: &str) -> Result<(), UserError> {
        let user = self.get_user(target_id).await?;
        if user.id.to_string() != caller_id {
            return Err(UserError::Forbidden);
        }

        let deleted = self.supabase.delete("users", &eq("id", user.id)).await?;
        if deleted == 0 {
            return Err(UserError::NotFound(target_id.to_string()));
        }

        info!(user_id = %user.id, "User deleted");
        Ok(())
    }
}
