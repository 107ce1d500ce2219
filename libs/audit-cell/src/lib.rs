pub mod event;
pub mod middleware;
pub mod models;
pub mod store;

pub use event::{build_audit_event, map_method_to_action, RequestContext};
pub use middleware::{audit_middleware, AuditState};
pub use models::AuditEvent;
pub use store::{audit_store_from_config, AuditStore, SupabaseAuditStore, TracingAuditStore};
