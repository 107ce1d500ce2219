use std::env;
use tracing::warn;

pub mod secrets;

pub use secrets::{resolve_secrets, KeyVaultClient, SecretSource};

const DEFAULT_CORS_ORIGINS: [&str; 4] = [
    "http://localhost:3000",
    "http://localhost:4200",
    "http://localhost:8000",
    "http://localhost:8001",
];

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub supabase_service_key: String,
    pub jwt_secret: String,
    pub jwt_algorithm: String,
    pub access_token_expire_minutes: i64,
    pub keyvault_name: String,
    pub keyvault_token: String,
    pub audit_source_name: String,
    pub audit_database: String,
    pub speech_key: String,
    pub speech_region: String,
    pub speech_base_url: String,
    pub speech_token_url: String,
    pub openai_api_base: String,
    pub openai_api_key: String,
    pub openai_chat_model: String,
    pub openai_chat_deployment: String,
    pub official_terms_path: String,
    pub cors_origins: Vec<String>,
    pub bind_address: String,
}

fn env_or_warn(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| {
        warn!("{} not set, using empty value", key);
        String::new()
    })
}

fn env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

impl AppConfig {
    pub fn from_env() -> Self {
        let speech_region = env::var("AZURE_SPEECH_SERVICE_LOCATION").unwrap_or_default();

        let speech_base_url = env::var("AZURE_SPEECH_BASE_URL").unwrap_or_else(|_| {
            if speech_region.is_empty() {
                String::new()
            } else {
                format!("https://{}.stt.speech.microsoft.com", speech_region)
            }
        });

        let speech_token_url = env::var("AZURE_SPEECH_TOKEN_URL").unwrap_or_else(|_| {
            if speech_region.is_empty() {
                String::new()
            } else {
                format!(
                    "https://{}.api.cognitive.microsoft.com/sts/v1.0/issueToken",
                    speech_region
                )
            }
        });

        let access_token_expire_minutes = env::var("ACCESS_TOKEN_EXPIRE_MINUTES")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(30);

        let cors_origins = env::var("CORS_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(|origin| origin.trim().to_string())
                    .filter(|origin| !origin.is_empty())
                    .collect()
            })
            .unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect());

        let config = Self {
            supabase_url: env_or_warn("SUPABASE_URL"),
            supabase_anon_key: env_or_warn("SUPABASE_ANON_PUBLIC_KEY"),
            supabase_service_key: env::var("SUPABASE_SERVICE_ROLE_KEY").unwrap_or_default(),
            // Usually supplied by the vault; see `resolve_secrets`.
            jwt_secret: env::var("SECRET_KEY").unwrap_or_default(),
            jwt_algorithm: env_or_default("JWT_ALGORITHM", "HS256"),
            access_token_expire_minutes,
            keyvault_name: env::var("AZURE_KEYVAULT_NAME").unwrap_or_default(),
            keyvault_token: env::var("AZURE_KEYVAULT_TOKEN").unwrap_or_default(),
            audit_source_name: env_or_default("AUDIT_SOURCE_NAME", "vaccination-booking-api"),
            audit_database: env_or_default("AZURE_AUDIT_DATABASE", "audit_events"),
            speech_key: env::var("AZURE_SPEECH_KEY").unwrap_or_default(),
            speech_region,
            speech_base_url,
            speech_token_url,
            openai_api_base: env_or_default("OPENAI_API_BASE", "https://api.openai.com/v1"),
            openai_api_key: env::var("OPENAI_API_KEY").unwrap_or_default(),
            openai_chat_model: env_or_default("OPENAI_CHAT_MODEL", "gpt-4o"),
            openai_chat_deployment: env::var("OPENAI_CHAT_DEPLOYMENT").unwrap_or_default(),
            official_terms_path: env_or_default("OFFICIAL_TERMS_PATH", "data/official_terms.json"),
            cors_origins,
            bind_address: env_or_default("BIND_ADDRESS", "127.0.0.1:8000"),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.supabase_url.is_empty() && !self.supabase_anon_key.is_empty()
    }

    pub fn is_keyvault_configured(&self) -> bool {
        !self.keyvault_name.is_empty()
    }

    pub fn is_speech_configured(&self) -> bool {
        !self.speech_key.is_empty()
            && !self.speech_base_url.is_empty()
            && !self.speech_token_url.is_empty()
    }

    /// Key used for the `Authorization` header towards the database REST API.
    /// The service role key wins over the public key when present.
    pub fn database_key(&self) -> &str {
        if self.supabase_service_key.is_empty() {
            &self.supabase_anon_key
        } else {
            &self.supabase_service_key
        }
    }
}
