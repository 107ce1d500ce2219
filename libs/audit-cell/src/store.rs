use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::info;

use shared_config::AppConfig;
use shared_database::SupabaseClient;

use crate::models::AuditEvent;

pub const AUDIT_TABLE: &str = "audit_events";

/// Destination for audit events.
#[async_trait]
pub trait AuditStore: Send + Sync {
    async fn persist(&self, event: &AuditEvent) -> Result<()>;
}

/// Writes each event as a JSON document row.
pub struct SupabaseAuditStore {
    supabase: SupabaseClient,
    table: String,
}

impl SupabaseAuditStore {
    pub fn new(config: &AppConfig) -> Self {
        let table = if config.audit_database.is_empty() {
            AUDIT_TABLE.to_string()
        } else {
            config.audit_database.clone()
        };
        Self {
            supabase: SupabaseClient::new(config),
            table,
        }
    }
}

#[async_trait]
impl AuditStore for SupabaseAuditStore {
    async fn persist(&self, event: &AuditEvent) -> Result<()> {
        let row = json!({
            "id": event.id,
            "resource_type": event.resource_type,
            "document": serde_json::to_value(event)?,
            "recorded": event.recorded.to_rfc3339(),
        });
        let _: Value = self.supabase.insert(&self.table, row).await?;
        Ok(())
    }
}

/// Emits events as structured log lines only.
pub struct TracingAuditStore;

#[async_trait]
impl AuditStore for TracingAuditStore {
    async fn persist(&self, event: &AuditEvent) -> Result<()> {
        info!(
            target: "audit",
            audit_id = %event.id,
            action = %event.action,
            actor = event.actor().unwrap_or_default(),
            succeeded = event.succeeded(),
            entity = event.entity.first().map(|e| e.what.reference.as_str()).unwrap_or_default(),
            "audit event"
        );
        Ok(())
    }
}

/// Database-backed when the store is configured, log-only otherwise.
pub fn audit_store_from_config(config: &AppConfig) -> Arc<dyn AuditStore> {
    if config.is_configured() {
        Arc::new(SupabaseAuditStore::new(config))
    } else {
        Arc::new(TracingAuditStore)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{build_audit_event, RequestContext};
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn supabase_store_inserts_document_row() {
        let server = MockServer::start().await;
        let config = AppConfig {
            supabase_url: server.uri(),
            supabase_anon_key: "anon".to_string(),
            ..Default::default()
        };
        let event = build_audit_event(&RequestContext::new("GET", "/health", None), 200, None, "svc");

        Mock::given(method("POST"))
            .and(path("/rest/v1/audit_events"))
            .and(body_partial_json(json!({
                "id": event.id,
                "resource_type": "AuditEvent",
                "document": { "action": "R" }
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!([{ "id": event.id }])))
            .expect(1)
            .mount(&server)
            .await;

        SupabaseAuditStore::new(&config).persist(&event).await.unwrap();
    }

    #[tokio::test]
    async fn supabase_store_honours_configured_table() {
        let server = MockServer::start().await;
        let config = AppConfig {
            supabase_url: server.uri(),
            supabase_anon_key: "anon".to_string(),
            audit_database: "fhir_audit".to_string(),
            ..Default::default()
        };
        Mock::given(method("POST"))
            .and(path("/rest/v1/fhir_audit"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!([{}])))
            .expect(1)
            .mount(&server)
            .await;

        let event = build_audit_event(&RequestContext::new("DELETE", "/users/1", None), 200, Some("1"), "svc");
        SupabaseAuditStore::new(&config).persist(&event).await.unwrap();
    }

    #[tokio::test]
    async fn supabase_store_surfaces_failures() {
        let server = MockServer::start().await;
        let config = AppConfig {
            supabase_url: server.uri(),
            supabase_anon_key: "anon".to_string(),
            ..Default::default()
        };
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let event = build_audit_event(&RequestContext::new("GET", "/", None), 200, None, "svc");
        assert!(SupabaseAuditStore::new(&config).persist(&event).await.is_err());
    }
}
