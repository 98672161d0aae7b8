//! Wire payload shapes for the MMS endpoints
//!
//! Field names match the server exactly; parsing is defensive because the
//! server omits fields rather than sending nulls.

use crate::http::Request;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;

/// The `source` marker attached to every export body
pub const EXPORT_SOURCE: &str = "magicdraw";

/// Extract `data.ticket` from a login response body
#[must_use]
pub fn login_ticket(body: &Value) -> Option<String> {
    body.get("data")?
        .get("ticket")?
        .as_str()
        .map(str::to_owned)
}

/// Response of the ticket-status endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TicketStatus {
    /// Set to `"Ticket not found"` when the ticket is unknown
    #[serde(default)]
    pub message: Option<String>,
    /// Username the ticket is bound to, when valid
    #[serde(default)]
    pub username: Option<String>,
}

impl TicketStatus {
    /// Defensive parse: an unrecognized body yields the empty status, which
    /// reads as "not confirmed invalid"
    #[must_use]
    pub fn from_body(body: &Value) -> Self {
        serde_json::from_value(body.clone()).unwrap_or_default()
    }

    /// The server explicitly reported the ticket unknown
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.message.as_deref() == Some("Ticket not found")
    }

    /// The server reported the ticket bound to a different user
    #[must_use]
    pub fn username_mismatch(&self, expected: &str) -> bool {
        self.username.as_deref().is_some_and(|u| u != expected)
    }
}

/// One serialized model element as exported to the server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementPayload {
    /// Element identifier
    #[serde(rename = "sysmlid")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// Kind-specific fields
    pub specialization: Value,
}

impl ElementPayload {
    #[must_use]
    pub fn new(id: impl Into<String>, specialization: Value) -> Self {
        Self {
            id: id.into(),
            name: None,
            owner: None,
            specialization,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Body of an element export POST
#[derive(Debug, Clone, Serialize)]
pub struct ExportBody {
    pub elements: Vec<ElementPayload>,
    pub source: &'static str,
}

impl ExportBody {
    #[must_use]
    pub fn new(elements: Vec<ElementPayload>) -> Self {
        Self {
            elements,
            source: EXPORT_SOURCE,
        }
    }

    /// Package this body as a queueable POST request
    #[must_use]
    pub fn into_request(self, url: impl Into<String>) -> Request {
        Request::post(url, json!(self))
    }
}

/// A remote element's intended value, keyed by element id in [`ImportResult`]
#[derive(Debug, Clone, Deserialize)]
pub struct KeyedValue {
    /// Wire name of the value kind
    #[serde(rename = "valueType")]
    pub value_type: String,
    /// Raw values, in order
    #[serde(default)]
    pub value: Vec<Value>,
}

/// Import/apply payload consumed by the apply-transaction engine
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImportResult {
    #[serde(rename = "elementsKeyed", default)]
    pub elements_keyed: HashMap<String, KeyedValue>,
}

impl ImportResult {
    /// Parse from a raw response body
    ///
    /// # Errors
    /// `serde_json::Error` when the body does not have the documented shape.
    pub fn from_body(body: &Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(body.clone())
    }

    /// Lookup of one element's intended value
    #[must_use]
    pub fn keyed(&self, element_id: &str) -> Option<&KeyedValue> {
        self.elements_keyed.get(element_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn login_ticket_requires_the_documented_path() {
        assert_eq!(
            login_ticket(&json!({"data": {"ticket": "T123"}})),
            Some("T123".to_owned())
        );
        assert_eq!(login_ticket(&json!({"ticket": "T123"})), None);
        assert_eq!(login_ticket(&json!({"data": {"ticket": 7}})), None);
        assert_eq!(login_ticket(&Value::Null), None);
    }

    #[test]
    fn ticket_status_verdicts() {
        let not_found = TicketStatus::from_body(&json!({"message": "Ticket not found"}));
        assert!(not_found.is_not_found());

        let valid = TicketStatus::from_body(&json!({"username": "alice"}));
        assert!(!valid.is_not_found());
        assert!(!valid.username_mismatch("alice"));
        assert!(valid.username_mismatch("bob"));

        // garbage body reads as "not confirmed invalid"
        let odd = TicketStatus::from_body(&json!([1, 2, 3]));
        assert!(!odd.is_not_found());
        assert!(!odd.username_mismatch("alice"));
    }

    #[test]
    fn export_body_carries_the_source_marker() {
        let body = ExportBody::new(vec![ElementPayload::new(
            "elem-1",
            json!({"type": "Property"}),
        )
        .with_name("mass")]);
        let value = json!(body);
        assert_eq!(value["source"], "magicdraw");
        assert_eq!(value["elements"][0]["sysmlid"], "elem-1");
        assert_eq!(value["elements"][0]["name"], "mass");
        assert!(value["elements"][0].get("owner").is_none());
    }

    #[test]
    fn import_result_round_trips_the_keyed_shape() {
        let body = json!({
            "elementsKeyed": {
                "elem-1": {"valueType": "LiteralInteger", "value": [5]},
                "elem-2": {"valueType": "LiteralString", "value": []}
            }
        });
        let result = ImportResult::from_body(&body).unwrap();
        assert_eq!(result.keyed("elem-1").unwrap().value_type, "LiteralInteger");
        assert_eq!(result.keyed("elem-1").unwrap().value, vec![json!(5)]);
        assert!(result.keyed("elem-2").unwrap().value.is_empty());
        assert!(result.keyed("ghost").is_none());
    }
}
