use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::AppConfig;

const KEYVAULT_API_VERSION: &str = "7.4";

pub const SIGNING_SECRET_NAME: &str = "secretKey";
pub const DATABASE_SECRET_NAME: &str = "supabaseServiceRoleKey";

#[async_trait]
pub trait SecretSource: Send + Sync {
    /// `Ok(None)` means the source answered but does not hold the secret.
    async fn get_secret(&self, name: &str) -> Result<Option<String>>;
}

#[derive(Debug, Deserialize)]
struct SecretBundle {
    value: String,
}

/// Reads secrets from an Azure Key Vault over its REST API.
pub struct KeyVaultClient {
    client: Client,
    vault_url: String,
    access_token: String,
}

impl KeyVaultClient {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_vault_url(
            format!("https://{}.vault.azure.net", config.keyvault_name),
            config.keyvault_token.clone(),
        )
    }

    pub fn with_vault_url(vault_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            vault_url: vault_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        }
    }
}

#[async_trait]
impl SecretSource for KeyVaultClient {
    async fn get_secret(&self, name: &str) -> Result<Option<String>> {
        let url = format!(
            "{}/secrets/{}?api-version={}",
            self.vault_url, name, KEYVAULT_API_VERSION
        );
        debug!("Fetching secret {} from key vault", name);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let bundle = response.json::<SecretBundle>().await?;
                Ok(Some(bundle.value))
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(anyhow!("Key vault error ({}): {}", status, body))
            }
        }
    }
}

async fn lookup(source: Option<&dyn SecretSource>, name: &str) -> Option<String> {
    let source = source?;
    match source.get_secret(name).await {
        Ok(Some(value)) => {
            info!("Retrieved '{}' from Key Vault.", name);
            Some(value)
        }
        Ok(None) => {
            warn!("Secret '{}' not found in Key Vault. Trying environment variable.", name);
            None
        }
        Err(e) => {
            warn!("Key Vault lookup for '{}' failed: {}. Trying environment variable.", name, e);
            None
        }
    }
}

/// Fills the signing secret and the database key from the vault, keeping the
/// values already loaded from the environment when the vault has nothing.
pub async fn resolve_secrets(config: &mut AppConfig, source: Option<&dyn SecretSource>) {
    if let Some(secret) = lookup(source, SIGNING_SECRET_NAME).await {
        config.jwt_secret = secret;
    }
    if let Some(key) = lookup(source, DATABASE_SECRET_NAME).await {
        config.supabase_service_key = key;
    }

    if config.jwt_secret.is_empty() {
        warn!("Secret '{}' was not found in Key Vault or environment.", SIGNING_SECRET_NAME);
    } else {
        info!("Secret '{}' has been set.", SIGNING_SECRET_NAME);
    }

    if config.supabase_service_key.is_empty() {
        warn!(
            "Secret '{}' was not found; database calls will use the public key.",
            DATABASE_SECRET_NAME
        );
    }
}
