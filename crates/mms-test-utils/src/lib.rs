//! Testing utilities for the MMS sync workspace
//!
//! Shared fakes, fixtures, and builders.

#![allow(missing_docs)]

use async_trait::async_trait;
use mms_client::{HttpResponse, HttpTransport, Request, TransportError};
use mms_model::{Element, ModelStore};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Once;

/// Initialize a tracing subscriber once for the whole test binary
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .with_test_writer()
            .try_init();
    });
}

/// Transport that replays a script of canned responses and records every
/// request it sees, in order
///
/// When the script runs dry it answers `200` with an empty body, so
/// fire-and-forget sends keep working without scripting each one.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: Mutex<Vec<Request>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a successful response to the script
    pub fn push_ok(&self, status: u16, body: Value) {
        self.script.lock().push_back(Ok(HttpResponse::new(status, body)));
    }

    /// Append a transport failure to the script
    pub fn push_err(&self, error: TransportError) {
        self.script.lock().push_back(Err(error));
    }

    /// Every request executed so far, in execution order
    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().clone()
    }

    /// URLs of every request executed so far, in execution order
    pub fn request_urls(&self) -> Vec<String> {
        self.requests.lock().iter().map(|r| r.url().to_owned()).collect()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn execute(&self, request: &Request) -> Result<HttpResponse, TransportError> {
        self.requests.lock().push(request.clone());
        self.script
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(HttpResponse::new(200, Value::Null)))
    }
}

/// Login response body carrying `data.ticket`
pub fn login_response(ticket: &str) -> Value {
    json!({"data": {"ticket": ticket}})
}

/// Ticket-status body confirming the ticket for `username`
pub fn ticket_valid_response(username: &str) -> Value {
    json!({"username": username})
}

/// Ticket-status body reporting the ticket unknown
pub fn ticket_not_found_response() -> Value {
    json!({"message": "Ticket not found"})
}

/// Store pre-populated with the given elements
pub fn store_with(elements: impl IntoIterator<Item = Element>) -> ModelStore {
    let store = ModelStore::new();
    for element in elements {
        store.insert(element);
    }
    store
}

/// Import payload with one `elementsKeyed` entry per `(id, valueType, values)`
pub fn import_payload<'a>(
    entries: impl IntoIterator<Item = (&'a str, &'a str, Vec<Value>)>,
) -> Value {
    let mut keyed = serde_json::Map::new();
    for (id, value_type, values) in entries {
        keyed.insert(
            id.to_owned(),
            json!({"valueType": value_type, "value": values}),
        );
    }
    json!({"elementsKeyed": keyed})
}
