use std::any::Any;
use std::net::SocketAddr;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use futures::FutureExt;
use serde_json::json;
use tracing::{debug, error};

use shared_models::auth::AuditActor;

use crate::event::{build_audit_event, RequestContext};
use crate::store::AuditStore;

#[derive(Clone)]
pub struct AuditState {
    pub store: Arc<dyn AuditStore>,
    pub source_name: String,
}

impl AuditState {
    pub fn new(store: Arc<dyn AuditStore>, source_name: impl Into<String>) -> Self {
        Self {
            store,
            source_name: source_name.into(),
        }
    }
}

fn client_address(request: &Request<Body>) -> Option<String> {
    if let Some(ConnectInfo(addr)) = request.extensions().get::<ConnectInfo<SocketAddr>>() {
        return Some(addr.ip().to_string());
    }
    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "Internal Server Error".to_string()
    }
}

/// Records one FHIR AuditEvent per request. The response passes through
/// unchanged; a handler panic is turned into a 500 and audited as a failure.
pub async fn audit_middleware(
    State(state): State<AuditState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let context = RequestContext::new(
        request.method().as_str(),
        request.uri().path(),
        client_address(&request),
    );

    let response = match AssertUnwindSafe(next.run(request)).catch_unwind().await {
        Ok(response) => response,
        Err(panic) => {
            let message = panic_message(panic.as_ref());
            error!(request_id = %context.id, "Handler panicked: {}", message);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "detail": message }))).into_response()
        }
    };

    let actor = response.extensions().get::<AuditActor>().map(|a| a.0.as_str());
    let event = build_audit_event(&context, response.status().as_u16(), actor, &state.source_name);

    match state.store.persist(&event).await {
        Ok(()) => debug!(audit_id = %event.id, "Audit event stored"),
        Err(e) => error!(audit_id = %event.id, "Failed to store audit event: {}", e),
    }

    response
}
