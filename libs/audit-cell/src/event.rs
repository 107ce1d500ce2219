use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{
    Agent, AuditEvent, CodeableConcept, Coding, Entity, EntityWhat, Identifier, Observer, Outcome,
    Source, Who,
};

const AUDIT_EVENT_TYPE: &str = "http://terminology.hl7.org/CodeSystem/audit-event-type";
const DICOM: &str = "http://dicom.nema.org/resources/ontology/DCM";
const EVENT_OUTCOME: &str = "http://terminology.hl7.org/CodeSystem/event-outcome";
const SECURITY_SOURCE_TYPE: &str = "http://terminology.hl7.org/CodeSystem/security-source-type";

pub const ANONYMOUS: &str = "anonymous";

/// FHIR action code for an HTTP method: C, R, U, D, or E for anything else.
pub fn map_method_to_action(method: &str) -> &'static str {
    match method.to_ascii_uppercase().as_str() {
        "GET" => "R",
        "POST" => "C",
        "PUT" | "PATCH" => "U",
        "DELETE" => "D",
        _ => "E",
    }
}

/// What the audit layer knows about a request before the handler runs.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub method: String,
    pub path: String,
    pub client_address: Option<String>,
}

impl RequestContext {
    pub fn new(method: &str, path: &str, client_address: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            method: method.to_string(),
            path: path.to_string(),
            client_address,
        }
    }
}

pub fn build_audit_event(
    context: &RequestContext,
    status: u16,
    actor: Option<&str>,
    source_name: &str,
) -> AuditEvent {
    let success = (200..400).contains(&status);
    let (outcome_code, outcome_display, outcome_text) = if success {
        ("0", "Success", "Operation succeeded")
    } else {
        ("8", "Failure", "Operation failed")
    };

    let code_text = if context.path == "/login" {
        "User Login"
    } else {
        "REST API call"
    };

    AuditEvent {
        resource_type: "AuditEvent".to_string(),
        id: context.id.to_string(),
        category: vec![CodeableConcept::single(
            Coding::new(AUDIT_EVENT_TYPE, "rest", "RESTful Operation"),
            "RESTful Operation",
        )],
        code: CodeableConcept::single(
            Coding::new(DICOM, "110100", "Application Activity"),
            code_text,
        ),
        action: map_method_to_action(&context.method).to_string(),
        severity: "informational".to_string(),
        occurred_date_time: context.started_at,
        recorded: context.started_at,
        outcome: Outcome {
            code: CodeableConcept::single(
                Coding::new(EVENT_OUTCOME, outcome_code, outcome_display),
                outcome_text,
            ),
            detail: None,
        },
        agent: vec![Agent {
            who: Who {
                identifier: Identifier {
                    value: actor.unwrap_or(ANONYMOUS).to_string(),
                },
            },
            requestor: true,
            network_string: context.client_address.clone(),
        }],
        source: Source {
            observer: Observer {
                identifier: Identifier {
                    value: source_name.to_string(),
                },
            },
            source_type: vec![CodeableConcept::single(
                Coding::new(SECURITY_SOURCE_TYPE, "4", "Application Server"),
                "Application Server",
            )],
        },
        entity: vec![Entity {
            what: EntityWhat {
                reference: context.path.clone(),
            },
            role: CodeableConcept::single(
                Coding::new(DICOM, "110153", "Source Role ID"),
                "Accessed Resource or Endpoint",
            ),
        }],
    }
}
