//! Subset of the FHIR R5 `AuditEvent` resource.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coding {
    pub system: String,
    pub code: String,
    pub display: String,
}

impl Coding {
    pub fn new(system: &str, code: &str, display: &str) -> Self {
        Self {
            system: system.to_string(),
            code: code.to_string(),
            display: display.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeableConcept {
    pub coding: Vec<Coding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl CodeableConcept {
    pub fn single(coding: Coding, text: &str) -> Self {
        Self {
            coding: vec![coding],
            text: Some(text.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identifier {
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Who {
    pub identifier: Identifier,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    pub who: Who,
    pub requestor: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_string: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeDetail {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub code: CodeableConcept,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<Vec<OutcomeDetail>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observer {
    pub identifier: Identifier,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub observer: Observer,
    #[serde(rename = "type")]
    pub source_type: Vec<CodeableConcept>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityWhat {
    pub reference: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub what: EntityWhat,
    pub role: CodeableConcept,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEvent {
    pub resource_type: String,
    pub id: String,
    pub category: Vec<CodeableConcept>,
    pub code: CodeableConcept,
    pub action: String,
    pub severity: String,
    pub occurred_date_time: DateTime<Utc>,
    pub recorded: DateTime<Utc>,
    pub outcome: Outcome,
    pub agent: Vec<Agent>,
    pub source: Source,
    pub entity: Vec<Entity>,
}

impl AuditEvent {
    pub fn succeeded(&self) -> bool {
        self.outcome
            .code
            .coding
            .first()
            .map(|c| c.code == "0")
            .unwrap_or(false)
    }

    pub fn actor(&self) -> Option<&str> {
        self.agent.first().map(|a| a.who.identifier.value.as_str())
    }
}
